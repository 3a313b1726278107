use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wash_registry::{BoundarySchema, DocumentKind, DocumentLoad, Endpoints};
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::state::WebState;

async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or("no window")?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|_| format!("invalid request for {url}"))?;

    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| format!("network error fetching {url}"))?;
    let response = response_value
        .dyn_into::<Response>()
        .map_err(|_| "failed to read response".to_string())?;
    if !response.ok() {
        return Err(format!("{url} returned HTTP {}", response.status()));
    }

    let text_promise = response
        .text()
        .map_err(|_| format!("failed to read {url} body"))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|_| format!("failed to read {url} body"))?;
    text.as_string()
        .ok_or_else(|| format!("{url} body is not text"))
}

/// Fetch one document and hand it to the shared state. Failures are logged and
/// leave whatever was loaded before in place.
pub async fn load_document(
    kind: DocumentKind,
    endpoints: Endpoints,
    schema: BoundarySchema,
    state: Rc<RefCell<WebState>>,
) {
    let url = endpoints.url(kind);
    let load = match fetch_text(&url).await {
        Ok(body) => kind.parse(&body, &schema),
        Err(reason) => DocumentLoad::failed(kind, reason),
    };

    if let DocumentLoad::Failed { reason, .. } = &load {
        web_sys::console::error_1(&format!("Failed to load {}: {reason}", kind.label()).into());
    }

    state.borrow_mut().apply(load);
}
