use vitrine_core::MotionConfig;
use web_sys::{Document, UrlSearchParams, Window};

pub(crate) const CONFIG_ELEMENT_ID: &str = "vitrine-config";
const DEBUG_PARAM: &str = "vitrine_debug";

pub(crate) fn load_config(window: &Window, document: &Document) -> MotionConfig {
    let mut config = read_embedded(document);
    if debug_requested(window) {
        config.debug = true;
    }
    config
}

fn read_embedded(document: &Document) -> MotionConfig {
    let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return MotionConfig::default();
    };
    let raw = element.text_content().unwrap_or_default();
    if raw.trim().is_empty() {
        return MotionConfig::default();
    }
    match MotionConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            gloo::console::warn!("vitrine: config ignored", err.to_string());
            MotionConfig::default()
        }
    }
}

fn debug_requested(window: &Window) -> bool {
    let Ok(search) = window.location().search() else {
        return false;
    };
    let Ok(params) = UrlSearchParams::new_with_str(&search) else {
        return false;
    };
    match params.get(DEBUG_PARAM).as_deref() {
        Some("0") | Some("false") => false,
        Some(_) => true,
        None => false,
    }
}
