/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Zero point for local id timestamps, 2024-01-01T00:00:00Z
const LOCAL_ID_EPOCH_MS: i64 = 1_704_067_200_000;
/// Low bits filled with random salt
const LOCAL_ID_SALT_BITS: u32 = 12;
/// Local ids stay below JavaScript's Number.MAX_SAFE_INTEGER
const LOCAL_ID_BITS: u32 = 53;

/// Id for an item that has not reached the remote store.
///
/// Milliseconds since the 2024 epoch, shifted above a random salt.
/// Store ids are small sequence values, so the two never meet.
pub fn local_item_id() -> i64 {
    use rand::Rng;
    let span = 1i64 << (LOCAL_ID_BITS - LOCAL_ID_SALT_BITS);
    let elapsed = (now_millis() - LOCAL_ID_EPOCH_MS).rem_euclid(span);
    let salt = rand::thread_rng().gen_range(0..1i64 << LOCAL_ID_SALT_BITS);
    (elapsed << LOCAL_ID_SALT_BITS) | salt
}
