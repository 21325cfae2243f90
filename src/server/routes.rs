// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! HTTP surface of the file library.
//!
//! `POST /save` stores a page, any other method on `/save` gets a JSON
//! error with 405, and `GET /library/<file>` serves saved pages.

use super::{FileLibrary, SaveReply, SaveRequest};
use crate::config::ServerSettings;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::runtime::Builder;
use warp::http::{Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection};

/// Largest accepted request body; pages embed the image as base64.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Build the library routes.
pub fn routes(
    library: Arc<FileLibrary>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let files_dir = library.dir().to_path_buf();
    let library_filter = warp::any().map(move || library.clone());

    let save = warp::path("save")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(library_filter)
        .map(|body: Bytes, library: Arc<FileLibrary>| {
            let (status, reply) = match serde_json::from_slice::<SaveRequest>(&body) {
                Ok(request) => library.save(&request),
                Err(e) => {
                    log::warn!("Rejected malformed save request: {}", e);
                    (StatusCode::BAD_REQUEST, SaveReply::failure("Invalid JSON body"))
                }
            };
            warp::reply::with_status(warp::reply::json(&reply), status)
        })
        .recover(body_rejection);

    let wrong_method = warp::path("save")
        .and(warp::path::end())
        .and(warp::method())
        .and_then(|method: Method| async move {
            if method == Method::POST {
                return Err(warp::reject::not_found());
            }
            Ok(warp::reply::with_status(
                warp::reply::json(&SaveReply::failure("Only POST requests allowed")),
                StatusCode::METHOD_NOT_ALLOWED,
            ))
        });

    let files = warp::path("library").and(warp::fs::dir(files_dir));

    save.or(wrong_method).or(files)
}

/// Answer body size rejections on `/save` with the JSON reply clients
/// expect. Everything else falls through to the next route.
async fn body_rejection(rejection: Rejection) -> Result<WithStatus<Json>, Rejection> {
    let (status, message) = if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Missing Content-Length")
    } else {
        return Err(rejection);
    };
    log::warn!("Rejected save request: {}", message);
    Ok(warp::reply::with_status(
        warp::reply::json(&SaveReply::failure(message)),
        status,
    ))
}

/// Run the library server until the process is stopped.
pub fn serve(settings: &ServerSettings) -> Result<()> {
    let library = Arc::new(FileLibrary::open(
        &settings.library_dir,
        settings.public_base_url(),
    )?);
    let bind = settings.bind;

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;

    runtime.block_on(async move {
        let library_dir = library.dir().display().to_string();
        let (addr, server) = warp::serve(routes(library))
            .try_bind_ephemeral(bind)
            .with_context(|| format!("binding {}", bind))?;
        log::info!("Hotspot library listening on http://{} (storing in {})", addr, library_dir);
        server.await;
        Ok::<(), anyhow::Error>(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn library() -> (tempfile::TempDir, Arc<FileLibrary>) {
        let dir = tempfile::tempdir().unwrap();
        let library = FileLibrary::open(dir.path().join("library"), "http://localhost:8080").unwrap();
        (dir, Arc::new(library))
    }

    fn body(response: &warp::http::Response<Bytes>) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn post_saves_and_serves_file() {
        let (_dir, library) = library();
        let filter = routes(library);

        let response = warp::test::request()
            .method("POST")
            .path("/save")
            .json(&json!({"filename": "door plan", "content": "<h1>Door</h1>"}))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let reply = body(&response);
        assert_eq!(reply["success"], true);
        assert_eq!(reply["filename"], "door-plan.html");
        assert_eq!(reply["url"], "http://localhost:8080/library/door-plan.html");
        assert_eq!(reply["overwritten"], false);

        let served = warp::test::request()
            .path("/library/door-plan.html")
            .reply(&filter)
            .await;
        assert_eq!(served.status(), StatusCode::OK);
        assert_eq!(served.body().as_ref(), b"<h1>Door</h1>");
    }

    #[tokio::test]
    async fn duplicate_without_overwrite_is_conflict() {
        let (_dir, library) = library();
        let filter = routes(library);
        let request = json!({"filename": "plan.html", "content": "a"});

        warp::test::request()
            .method("POST")
            .path("/save")
            .json(&request)
            .reply(&filter)
            .await;
        let response = warp::test::request()
            .method("POST")
            .path("/save")
            .json(&request)
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let reply = body(&response);
        assert_eq!(reply["success"], false);
        assert_eq!(reply["fileExists"], true);
        assert_eq!(reply["error"], "File already exists");
    }

    #[tokio::test]
    async fn get_on_save_is_rejected_with_json() {
        let (_dir, library) = library();
        let response = warp::test::request()
            .method("GET")
            .path("/save")
            .reply(&routes(library))
            .await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let reply = body(&response);
        assert_eq!(reply["success"], false);
        assert_eq!(reply["error"], "Only POST requests allowed");
    }

    #[tokio::test]
    async fn oversized_or_unsized_body_gets_json_error() {
        let (_dir, library) = library();
        let filter = routes(library);

        let too_large = warp::test::request()
            .method("POST")
            .path("/save")
            .body("{}")
            .header("content-length", (MAX_BODY_BYTES + 1).to_string())
            .reply(&filter)
            .await;
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body(&too_large)["success"], false);
        assert_eq!(body(&too_large)["error"], "Request body too large");

        let r#unsized = warp::test::request()
            .method("POST")
            .path("/save")
            .reply(&filter)
            .await;
        assert_eq!(r#unsized.status(), StatusCode::LENGTH_REQUIRED);
        assert_eq!(body(&r#unsized)["success"], false);

        let missing = warp::test::request()
            .path("/library/nothing.html")
            .reply(&filter)
            .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (_dir, library) = library();
        let response = warp::test::request()
            .method("POST")
            .path("/save")
            .body("{oops")
            .reply(&routes(library))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&response)["success"], false);
    }
}
