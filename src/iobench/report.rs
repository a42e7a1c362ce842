use crate::clock::posix::NSEC_PER_SEC;

/// Result line printed to stdout: `"<MB/s>MB/s"` to two decimals, or a
/// marker when the clock did not advance.
pub fn format_throughput(file_size_mb: u64, elapsed_ns: i64) -> String {
    if elapsed_ns <= 0 {
        return "elapsed_ns == 0".to_string();
    }
    let mb_per_sec = file_size_mb as f64 * NSEC_PER_SEC as f64 / elapsed_ns as f64;
    format!("{:.2}MB/s", mb_per_sec)
}
