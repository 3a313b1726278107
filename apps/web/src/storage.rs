use wash_registry::camera::is_secure_context;
use wash_registry::{FilterState, FILTER_STORAGE_KEY};
use web_sys::Storage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Last applied filters, or the defaults when nothing usable is stored.
pub fn load_filters() -> FilterState {
    local_storage()
        .and_then(|storage| storage.get_item(FILTER_STORAGE_KEY).ok().flatten())
        .map_or_else(FilterState::default, |raw| FilterState::from_storage(&raw))
}

pub fn save_filters(filters: &FilterState) {
    let raw = match filters.to_storage() {
        Ok(raw) => raw,
        Err(error) => {
            web_sys::console::error_1(&format!("Failed to encode filters: {error}").into());
            return;
        }
    };

    let Some(storage) = local_storage() else {
        return;
    };
    if storage.set_item(FILTER_STORAGE_KEY, &raw).is_err() {
        web_sys::console::error_1(&"Failed to save filters".into());
    }
}

pub fn page_is_secure() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_default();
    let host = location.host().unwrap_or_default();
    is_secure_context(&protocol, &host)
}
