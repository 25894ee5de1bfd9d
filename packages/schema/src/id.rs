use crc32fast::Hasher;

/// Generate a stable document id from a page name using CRC32
pub fn get_document_id(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for schema nodes within a document.
///
/// Ids are `<seed>-<n>`: the seed ties them to the document, the counter
/// keeps them unique within it. Generated ids never change once assigned.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: get_document_id(name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next sequential id
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
