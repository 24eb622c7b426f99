#![allow(dead_code)]

use std::io::Error;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SECRET: &str = "testkey";

pub fn write_notifications(path: &Path, rows: &[(&str, &str, &str, i64)]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["package", "title", "text", "time"])?;
    for (package, title, text, time) in rows {
        wtr.write_record([*package, *title, *text, time.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Mock backend answering every `POST /payment` with `status`.
pub async fn payment_server(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payment"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}
