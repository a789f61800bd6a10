use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
}

impl Health {
    pub fn ok(service: &'static str) -> Self {
        Self { status: "ok", service }
    }
}
