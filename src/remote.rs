//! Fetch images over HTTP(S).

use std::io::Read;

use image::RgbaImage;

use crate::{
    config::settings,
    foundation::error::{EditError, EditResult},
    offload::offload,
    source::decode_rgba,
};

/// GET `url` and decode the body into an RGBA surface.
pub async fn load_image(url: &str) -> EditResult<RgbaImage> {
    let url = url.to_owned();
    offload(move || {
        let bytes = fetch_blocking(&url)?;
        decode_rgba(&bytes).map_err(|e| {
            tracing::warn!(%url, "remote body is not an image");
            e
        })
    })
    .await
}

/// GET `url` and return the raw body.
pub async fn fetch_bytes(url: &str) -> EditResult<Vec<u8>> {
    let url = url.to_owned();
    offload(move || fetch_blocking(&url)).await
}

fn fetch_blocking(url: &str) -> EditResult<Vec<u8>> {
    let s = settings();
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(s.http_timeout))
        .build()
        .into();

    let resp = agent.get(url).call().map_err(|e| {
        tracing::warn!(%url, error = %e, "remote fetch failed");
        EditError::network(format!("GET {url}: {e}"))
    })?;
    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(%url, %status, "remote fetch rejected");
        return Err(EditError::network(format!("GET {url}: status {status}")));
    }

    let mut body = Vec::new();
    resp.into_body()
        .into_reader()
        .take(s.http_max_bytes + 1)
        .read_to_end(&mut body)
        .map_err(|e| EditError::network(format!("GET {url}: read body: {e}")))?;
    if body.len() as u64 > s.http_max_bytes {
        return Err(EditError::network(format!(
            "GET {url}: body exceeds {} bytes",
            s.http_max_bytes
        )));
    }

    tracing::debug!(%url, bytes = body.len(), "remote fetch complete");
    Ok(body)
}

#[cfg(test)]
#[path = "../tests/unit/remote.rs"]
mod tests;
