/// Partition names and key layout for the crawl store
///
/// Partition structure:
/// - `requests`: u64 fingerprint (big-endian) -> empty marker
/// - `cookies`: origin string (UTF-8) -> serialized cookie jar
/// - `queue`: u64 sequence (big-endian) -> serialized request
/// - `sequences`: partition name -> last issued u64 (big-endian)
///
/// Fjall orders keys by raw bytes, so integer keys are written
/// most-significant byte first to keep cursor order equal to numeric order.

pub const PARTITION_REQUESTS: &str = "requests";
pub const PARTITION_COOKIES: &str = "cookies";
pub const PARTITION_QUEUE: &str = "queue";
pub const PARTITION_SEQUENCES: &str = "sequences";

/// Every partition provisioned by `CrawlStore::init`, in creation order.
pub const ALL_PARTITIONS: [&str; 4] = [
    PARTITION_REQUESTS,
    PARTITION_COOKIES,
    PARTITION_QUEUE,
    PARTITION_SEQUENCES,
];

/// Width of an encoded integer key.
pub const U64_KEY_LEN: usize = 8;

/// Encode a u64 into an order-preserving 8-byte key
pub fn encode_u64_key(n: u64) -> [u8; U64_KEY_LEN] {
    n.to_be_bytes()
}

/// Decode an 8-byte key back into its u64, `None` for any other width
pub fn decode_u64_key(key: &[u8]) -> Option<u64> {
    let bytes: [u8; U64_KEY_LEN] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/// Encode a cookie key: the origin exactly as given
pub fn encode_cookie_key(origin: &str) -> &[u8] {
    origin.as_bytes()
}

/// Encode a sequence counter key: sequences are tracked per owning partition
pub fn encode_sequence_key(partition: &str) -> &[u8] {
    partition.as_bytes()
}
