/// Hash `password` the way the Growatt server expects it: lowercase hex MD5 digest with every
/// `0` digit replaced by `c`.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", md5::compute(password.as_bytes()))
        .chars()
        .map(|c| if c == '0' { 'c' } else { c })
        .collect()
}
