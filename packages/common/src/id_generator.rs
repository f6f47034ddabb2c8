use crc32fast::Hasher;

/// Generate a stable course ID from a course name using CRC32
pub fn get_course_id(name: &str) -> String {
    let mut buff = String::from(name.trim());
    if !buff.starts_with("course://") {
        buff = format!("course://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for blocks within a course
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Course ID (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(course_name: &str) -> Self {
        Self {
            seed: get_course_id(course_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    ///
    /// The counter wraps at `u32::MAX`; callers holding existing ids must
    /// skip any collision.
    pub fn new_id(&mut self) -> String {
        self.count = self.count.wrapping_add(1);
        format!("{}-{}", self.seed, self.count)
    }

    /// Skip past an ID minted by a previous generator with the same seed,
    /// so ids loaded from a snapshot are never handed out again.
    pub fn observe(&mut self, id: &str) {
        let Some(rest) = id.strip_prefix(self.seed.as_str()) else {
            return;
        };
        if let Some(n) = rest.strip_prefix('-').and_then(|n| n.parse::<u32>().ok()) {
            self.count = self.count.max(n);
        }
    }

    /// Get course ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_id_generation() {
        let id1 = get_course_id("Basic Technology");
        let id2 = get_course_id("Basic Technology");

        // Same name always generates same ID
        assert_eq!(id1, id2);

        // Different names generate different IDs
        let id3 = get_course_id("Digital Marketing");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("Basic Technology");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id3.ends_with("-3"));

        let seed = gen.seed();
        assert!(id1.starts_with(seed));
        assert!(id3.starts_with(seed));
    }

    #[test]
    fn test_observe_skips_existing_ids() {
        let mut gen = IdGenerator::from_seed("abc");
        gen.observe("abc-7");
        gen.observe("other-40");
        gen.observe("abc-3");

        assert_eq!(gen.new_id(), "abc-8");
    }

    #[test]
    fn test_counter_wraps_after_max_id() {
        let mut gen = IdGenerator::from_seed("abc");
        gen.observe(&format!("abc-{}", u32::MAX));

        assert_eq!(gen.new_id(), "abc-0");
        assert_eq!(gen.new_id(), "abc-1");
    }
}
