use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
#[error("{status_code} status code: {status_text}")]
pub struct ServerError {
    pub status_code: u16,
    pub status_text: String,
}

/// Require an exact `200 OK`; other 2xx codes are rejected too.
pub fn check_status(res: &reqwest::Response) -> Result<(), ServerError> {
    let status = res.status();
    if status != StatusCode::OK {
        return Err(ServerError {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
        });
    }
    Ok(())
}
