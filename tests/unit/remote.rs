use std::{
    io::{Read, Write},
    net::TcpListener,
};

use super::*;

fn http_response(status: &str, body: &[u8]) -> Vec<u8> {
    let mut out = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    out.extend_from_slice(body);
    out
}

fn serve_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut req = Vec::new();
        let mut buf = [0u8; 1024];
        while !req.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => req.extend_from_slice(&buf[..n]),
            }
        }
        let _ = stream.write_all(&response);
    });
    format!("http://{addr}/avatar.png")
}

fn png_bytes() -> Vec<u8> {
    let img = RgbaImage::from_pixel(3, 2, image::Rgba([9, 8, 7, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[tokio::test]
async fn loads_and_decodes_a_png() {
    let url = serve_once(http_response("200 OK", &png_bytes()));
    let img = load_image(&url).await.unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(1, 1).0, [9, 8, 7, 255]);
}

#[tokio::test]
async fn fetch_returns_raw_body() {
    let url = serve_once(http_response("200 OK", b"hello"));
    assert_eq!(fetch_bytes(&url).await.unwrap(), b"hello");
}

#[tokio::test]
async fn non_success_status_is_network_error() {
    let url = serve_once(http_response("404 Not Found", b"missing"));
    let err = load_image(&url).await.unwrap_err();
    assert!(matches!(err, EditError::Network(_)), "{err}");
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let err = fetch_bytes(&format!("http://127.0.0.1:{port}/x.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, EditError::Network(_)), "{err}");
}

#[tokio::test]
async fn garbage_body_is_decode_error() {
    let url = serve_once(http_response("200 OK", b"definitely not an image"));
    let err = load_image(&url).await.unwrap_err();
    assert!(matches!(err, EditError::Decode(_)), "{err}");
}
