pub mod types;
pub mod utils;
pub mod signal;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok("server");
        assert_eq!(h.status, "ok");
        let json = serde_json::to_value(&h).expect("serialize");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "server");
    }
}
