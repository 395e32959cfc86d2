use leptos::prelude::*;
use thaw::ConfigProvider;

pub const APP_TITLE: &str = "Tra Cứu Lương Hoà Thọ Điện Bàn";
pub const APP_DESCRIPTION: &str = "MAY HÒA THỌ ĐIỆN BÀN";
pub const APP_LANG: &str = "en";

/// Root wrapper for every page.
///
/// Sets the document title, description and language, and provides the thaw
/// config context the UI components read their theme from.
#[component]
pub fn RootLayout(children: Children) -> impl IntoView {
    if let Err(e) = apply_document_metadata() {
        log::warn!("Document metadata not applied: {}", e);
    }

    view! {
        <ConfigProvider>
            <div class="app-layout">
                {children()}
            </div>
        </ConfigProvider>
    }
}

fn apply_document_metadata() -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document object")?;

    document.set_title(APP_TITLE);

    if let Some(root) = document.document_element() {
        root.set_attribute("lang", APP_LANG)
            .map_err(|e| format!("Failed to set lang: {:?}", e))?;
    }

    let meta = match document
        .query_selector("meta[name=\"description\"]")
        .map_err(|e| format!("Failed to query meta: {:?}", e))?
    {
        Some(meta) => meta,
        None => {
            let meta = document
                .create_element("meta")
                .map_err(|e| format!("Failed to create meta: {:?}", e))?;
            meta.set_attribute("name", "description")
                .map_err(|e| format!("Failed to set meta name: {:?}", e))?;
            document
                .head()
                .ok_or("No head element")?
                .append_child(&meta)
                .map_err(|e| format!("Failed to append meta: {:?}", e))?;
            meta
        }
    };
    meta.set_attribute("content", APP_DESCRIPTION)
        .map_err(|e| format!("Failed to set description: {:?}", e))?;

    Ok(())
}
