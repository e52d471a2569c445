//! Page rendering, clipboard and download.

use gloo_timers::callback::Timeout;
use js_sys::{Array, Function, Promise};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, Document, Element, HtmlAnchorElement, Url};

use super::{cast, document, property, window};
use crate::actions::ExportFile;
use crate::config::ElementIds;
use crate::error::{FingerprintError, Result, Unavailable};
use crate::presentation::{DisplaySurface, ListItem, Notice, Region, COPIED_LABEL, COPY_LABEL};

/// [`DisplaySurface`] bound to elements of the current document.
pub struct DomSurface {
    document: Document,
    ids: ElementIds,
    confirmation_ms: u32,
}

impl DomSurface {
    pub fn new(ids: ElementIds, confirmation_ms: u32) -> Result<Self> {
        let document = document().map_err(|e| FingerprintError::Dom(e.to_string()))?;
        Ok(Self {
            document,
            ids,
            confirmation_ms,
        })
    }

    fn id(&self, region: Region) -> &str {
        match region {
            Region::Summary => &self.ids.summary,
            Region::Digest => &self.ids.digest,
            Region::Hardware => &self.ids.hardware,
            Region::Screen => &self.ids.screen,
            Region::Features => &self.ids.features,
            Region::UserAgent => &self.ids.user_agent,
            Region::CanvasDigest => &self.ids.canvas_digest,
            Region::Webgl => &self.ids.webgl,
            Region::Audio => &self.ids.audio,
            Region::Fonts => &self.ids.fonts,
        }
    }

    pub fn element(&self, id: &str) -> Result<Element> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| FingerprintError::MissingElement(id.to_string()))
    }

    fn create(&self, tag: &str) -> Result<Element> {
        self.document
            .create_element(tag)
            .map_err(|e| FingerprintError::Dom(format!("createElement({}): {:?}", tag, e)))
    }

    fn list_item(&self, item: &ListItem) -> Result<Element> {
        let li = self.create("li")?;
        match &item.label {
            Some(label) => {
                let strong = self.create("strong")?;
                strong.set_text_content(Some(&format!("{}:", label)));
                li.append_child(&strong)
                    .map_err(|e| FingerprintError::Dom(format!("appendChild: {:?}", e)))?;
                li.insert_adjacent_text("beforeend", &format!(" {}", item.value))
                    .map_err(|e| FingerprintError::Dom(format!("insertAdjacentText: {:?}", e)))?;
            }
            None => li.set_text_content(Some(&item.value)),
        }
        Ok(li)
    }
}

impl DisplaySurface for DomSurface {
    fn set_text(&self, region: Region, text: &str) -> Result<()> {
        self.element(self.id(region))?.set_text_content(Some(text));
        Ok(())
    }

    fn set_list(&self, region: Region, items: &[ListItem]) -> Result<()> {
        let list = self.element(self.id(region))?;
        list.set_text_content(None);
        for item in items {
            let li = self.list_item(item)?;
            list.append_child(&li)
                .map_err(|e| FingerprintError::Dom(format!("appendChild: {:?}", e)))?;
        }
        Ok(())
    }

    fn notify(&self, notice: &Notice) {
        match window() {
            Ok(w) => {
                if let Err(e) = w.alert_with_message(&notice.message) {
                    log::warn!("alert failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("cannot show notice '{}': {}", notice.message, e),
        }
    }

    fn confirm_copy(&self) {
        let button = match self.element(&self.ids.copy_button) {
            Ok(button) => button,
            Err(e) => {
                log::debug!("{}", e);
                return;
            }
        };
        button.set_text_content(Some(COPIED_LABEL));
        Timeout::new(self.confirmation_ms, move || {
            button.set_text_content(Some(COPY_LABEL));
        })
        .forget();
    }
}

/// `navigator.clipboard.writeText(text)`
pub(super) async fn write_clipboard(text: &str) -> std::result::Result<(), Unavailable> {
    let nav: JsValue = window()?.navigator().into();
    let clipboard =
        property(&nav, "clipboard")?.ok_or_else(|| Unavailable::not_supported("navigator.clipboard"))?;
    let write: Function = cast(
        property(&clipboard, "writeText")?
            .ok_or_else(|| Unavailable::not_supported("clipboard.writeText"))?,
        "clipboard.writeText",
    )?;

    let promise: Promise = cast(
        write
            .call1(&clipboard, &JsValue::from_str(text))
            .map_err(|e| Unavailable::denied(format!("writeText: {:?}", e)))?,
        "writeText result",
    )?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| Unavailable::denied(format!("writeText: {:?}", e)))
}

/// Blob URL + temporary anchor click.
pub(super) fn download(file: &ExportFile) -> std::result::Result<(), Unavailable> {
    let document = document()?;
    let body = document
        .body()
        .ok_or_else(|| Unavailable::not_supported("document.body"))?;

    let options = BlobPropertyBag::new();
    options.set_type(&file.mime_type);
    let parts = Array::of1(&JsValue::from_str(&file.contents));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| Unavailable::from_js("Blob", &e))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| Unavailable::from_js("createObjectURL", &e))?;

    let anchor: HtmlAnchorElement = cast(
        document
            .create_element("a")
            .map_err(|e| Unavailable::from_js("createElement(a)", &e))?,
        "anchor",
    )?;
    anchor.set_href(&url);
    anchor.set_download(&file.filename);

    let clicked = body
        .append_child(&anchor)
        .map_err(|e| Unavailable::from_js("appendChild", &e))
        .map(|_| anchor.click());
    anchor.remove();

    if let Err(e) = Url::revoke_object_url(&url) {
        log::debug!("revokeObjectURL failed: {:?}", e);
    }
    clicked
}
