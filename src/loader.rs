use room_core::error::LoadError;
use room_core::scene_file::{LoadProgress, SceneFile, SceneProvider};
use room_core::SceneGraph;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let window = web::window().ok_or_else(|| LoadError::Fetch("no window".into()))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?
        .dyn_into::<web::Response>()
        .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?;
    if !resp.ok() {
        return Err(LoadError::Fetch(format!("{} returned {}", url, resp.status())));
    }
    let text = resp
        .text()
        .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?;
    JsFuture::from(text)
        .await
        .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?
        .as_string()
        .ok_or_else(|| LoadError::Parse("response body is not text".into()))
}

/// Fetch the scene description and build the graph from it. The fetch
/// itself counts as the first loaded item.
pub async fn load_scene(
    url: &str,
    mut on_progress: impl FnMut(LoadProgress),
) -> Result<SceneGraph, LoadError> {
    on_progress(LoadProgress {
        loaded: 0,
        total: 1,
    });
    let text = fetch_text(url).await?;
    let file = SceneFile::from_json(&text)?;
    let total = file.nodes.len() + 1;
    on_progress(LoadProgress { loaded: 1, total });

    let mut graph = SceneGraph::new();
    file.populate(&mut graph, &mut |p| {
        on_progress(LoadProgress {
            loaded: p.loaded + 1,
            total,
        })
    })?;
    Ok(graph)
}
