//! Per-partition sequence numbers backed by the `sequences` partition

use fjall::{ReadTransaction, TxPartitionHandle, WriteTransaction};

use super::error::{Result, StorageError};
use super::partitions::{decode_u64_key, encode_sequence_key, encode_u64_key};

/// Draw the next sequence number for `partition`
///
/// The counter is read, bumped and written back inside the caller's write
/// transaction, so it commits (or rolls back) together with whatever the
/// caller stores under the new number. The first number issued is 1 and a
/// number is never handed out twice, even after the owning partition drains.
pub fn next_sequence(
    tx: &mut WriteTransaction,
    sequences: &TxPartitionHandle,
    partition: &str,
) -> Result<u64> {
    let key = encode_sequence_key(partition);
    let last = match tx.get(sequences, key)? {
        Some(bytes) => decode_counter(partition, &bytes)?,
        None => 0,
    };

    let next = last
        .checked_add(1)
        .ok_or_else(|| StorageError::SequenceExhausted(partition.to_string()))?;
    tx.insert(sequences, key, encode_u64_key(next));

    Ok(next)
}

/// Last sequence number issued for `partition`, 0 if none yet
pub fn current_sequence(
    tx: &ReadTransaction,
    sequences: &TxPartitionHandle,
    partition: &str,
) -> Result<u64> {
    match tx.get(sequences, encode_sequence_key(partition))? {
        Some(bytes) => decode_counter(partition, &bytes),
        None => Ok(0),
    }
}

fn decode_counter(partition: &str, bytes: &[u8]) -> Result<u64> {
    decode_u64_key(bytes).ok_or_else(|| StorageError::CorruptSequence(partition.to_string()))
}
