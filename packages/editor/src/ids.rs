use chrono::Utc;

/// Session seed derived from the session start time
pub fn session_seed() -> String {
    format!("new_{:x}", Utc::now().timestamp_millis())
}

/// Sequential id generator for list items created in one editing session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::from_seed(session_seed())
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}_{}", self.seed, self.count)
    }

    /// Next ID not already taken in the target list
    pub fn fresh_id(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.new_id();
            if !taken(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("new_test");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert_eq!(id1, "new_test_1");
        assert_eq!(id2, "new_test_2");
        assert!(id1.starts_with(gen.seed()));
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let mut gen = IdGenerator::from_seed("s");
        let taken = ["s_1", "s_2"];

        let id = gen.fresh_id(|candidate| taken.contains(&candidate));
        assert_eq!(id, "s_3");
    }

    #[test]
    fn test_session_seed_shape() {
        let seed = session_seed();
        assert!(seed.starts_with("new_"));
        assert!(seed.len() > 4);
    }
}
