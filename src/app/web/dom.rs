//! web-sys implementations of the controller seams

use std::time::Duration;

use async_trait::async_trait;
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlTextAreaElement, Window};

use crate::app::composer::ComposerInput;
use crate::app::history::{ActionButton, ConversationListView};
use crate::app::notifications::{BANNER_STYLE, EXCLUSIVE_CLASS, Notice, Notifier};
use crate::app::transcript::{RenderedEntry, TranscriptView};
use crate::shared::errors::{ClientError, Result};
use crate::shared::logging::LogOperation;
use crate::shared::traits::{Confirmer, Navigator, Sleeper};

pub const ITEM_SELECTOR: &str = ".conversation-item";
pub const DELETE_BUTTON_SELECTOR: &str = ".delete-conversation-btn";
pub const CONVERSATION_ID_ATTR: &str = "data-conversation-id";

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| ClientError::MissingElement("window".into()))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| ClientError::MissingElement("document".into()))
}

fn create(document: &Document, tag: &str) -> Result<Element> {
    Ok(document.create_element(tag)?)
}

/// `#chatMessages`
pub struct ContainerView {
    document: Document,
    container: Element,
}

impl ContainerView {
    pub fn new(document: Document, container: Element) -> Self {
        Self {
            document,
            container,
        }
    }

    fn build(&self, entry: &RenderedEntry<'_>) -> Result<Element> {
        let node = create(&self.document, "div")?;
        node.set_class_name(&entry.class);

        match entry.time {
            Some(time) => {
                let content = create(&self.document, "div")?;
                content.set_class_name("message-content");
                content.set_text_content(Some(entry.text));
                node.append_child(&content)?;

                let stamp = create(&self.document, "div")?;
                stamp.set_class_name("message-time");
                stamp.set_text_content(Some(time));
                node.append_child(&stamp)?;
            }
            // placeholders are a bare text bubble
            None => node.set_text_content(Some(entry.text)),
        }
        Ok(node)
    }
}

impl TranscriptView for ContainerView {
    fn clear(&self) {
        self.container.set_inner_html("");
    }

    fn append(&self, entry: &RenderedEntry<'_>) {
        let appended = self
            .build(entry)
            .and_then(|node| Ok(self.container.append_child(&node)?));
        if let Err(e) = appended {
            tracing::error!(error = %e, "Failed to render transcript entry");
        }
    }

    fn scroll_to_bottom(&self) {
        self.container.set_scroll_top(self.container.scroll_height());
    }
}

/// `#chatText`
pub struct TextAreaInput {
    element: HtmlTextAreaElement,
}

impl TextAreaInput {
    pub fn new(element: HtmlTextAreaElement) -> Self {
        Self { element }
    }

    fn set_height(&self, value: &str) {
        let _ = self.element.style().set_property("height", value);
    }
}

impl ComposerInput for TextAreaInput {
    fn value(&self) -> String {
        self.element.value()
    }

    fn clear(&self) {
        self.element.set_value("");
    }

    fn reset_height(&self) {
        self.set_height("auto");
    }

    fn fit_to_content(&self) {
        self.set_height("auto");
        let height = self.element.scroll_height();
        self.set_height(&format!("{}px", height));
    }
}

/// Any clickable element whose label and disabled state we toggle
pub struct ButtonHandle {
    element: Element,
}

impl ButtonHandle {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn conversation_id(&self) -> String {
        self.element
            .get_attribute(CONVERSATION_ID_ATTR)
            .unwrap_or_default()
    }
}

impl ActionButton for ButtonHandle {
    fn label(&self) -> String {
        self.element.inner_html()
    }

    // labels are our own constants or the button's previous markup
    fn set_label(&self, label: &str) {
        self.element.set_inner_html(label);
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(button) = self.element.dyn_ref::<web_sys::HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if disabled {
            let _ = self.element.set_attribute("disabled", "");
        } else {
            let _ = self.element.remove_attribute("disabled");
        }
    }
}

/// Quote a value for use inside a CSS attribute selector
fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// The `.conversation-item` list
pub struct DocumentListView {
    document: Document,
}

impl DocumentListView {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn item(&self, conversation_id: &str) -> Option<HtmlElement> {
        let selector = format!(
            "{}[{}={}]",
            DELETE_BUTTON_SELECTOR,
            CONVERSATION_ID_ATTR,
            css_string(conversation_id)
        );
        self.document
            .query_selector(&selector)
            .ok()
            .flatten()?
            .closest(ITEM_SELECTOR)
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    /// Ids carried by the delete buttons currently in the document
    pub fn conversation_ids(&self) -> Vec<String> {
        let Ok(nodes) = self.document.query_selector_all(DELETE_BUTTON_SELECTOR) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|el| el.get_attribute(CONVERSATION_ID_ATTR))
            .collect()
    }
}

impl ConversationListView for DocumentListView {
    fn collapse_item(&self, conversation_id: &str) {
        let Some(item) = self.item(conversation_id) else {
            return;
        };
        let style = item.style();
        for (name, value) in [
            ("transition", "all 0.3s ease"),
            ("opacity", "0"),
            ("height", "0"),
            ("padding", "0"),
            ("margin", "0"),
            ("overflow", "hidden"),
        ] {
            let _ = style.set_property(name, value);
        }
    }

    fn remove_item(&self, conversation_id: &str) -> bool {
        match self.item(conversation_id) {
            Some(item) => {
                item.remove();
                true
            }
            None => false,
        }
    }

    fn item_count(&self) -> usize {
        self.document
            .query_selector_all(ITEM_SELECTOR)
            .map(|nodes| nodes.length() as usize)
            .unwrap_or(0)
    }
}

/// Fixed-position Bootstrap alert appended to `<body>`
pub struct BannerNotifier {
    document: Document,
}

impl BannerNotifier {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn build(&self, notice: &Notice) -> Result<HtmlElement> {
        let banner = create(&self.document, "div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ClientError::MissingElement("banner".into()))?;
        banner.set_class_name(&notice.class_name());
        banner.style().set_css_text(BANNER_STYLE);
        banner.set_text_content(Some(&notice.message));

        let close = create(&self.document, "button")?;
        close.set_attribute("type", "button")?;
        close.set_class_name("btn-close");
        close.set_attribute("data-bs-dismiss", "alert")?;
        banner.append_child(&close)?;
        Ok(banner)
    }

    fn remove_exclusive(&self) {
        let Ok(existing) = self
            .document
            .query_selector_all(&format!(".{}", EXCLUSIVE_CLASS))
        else {
            return;
        };
        for i in 0..existing.length() {
            if let Some(el) = existing.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                el.remove();
            }
        }
    }
}

impl Notifier for BannerNotifier {
    fn show(&self, notice: Notice) {
        if notice.exclusive {
            self.remove_exclusive();
        }

        let Some(body) = self.document.body() else {
            return;
        };
        let banner = match self.build(&notice) {
            Ok(banner) => banner,
            Err(e) => {
                tracing::error!(
                    operation = LogOperation::Notification.as_str(),
                    error = %e,
                    "Failed to build notification"
                );
                return;
            }
        };
        if body.append_child(&banner).is_err() {
            return;
        }

        let millis = u32::try_from(notice.dismiss_after.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || banner.remove()).forget();
    }
}

/// `window.confirm`
pub struct WindowConfirmer {
    window: Window,
}

impl WindowConfirmer {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Confirmer for WindowConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        self.window.confirm_with_message(prompt).unwrap_or(false)
    }
}

pub struct TimeoutSleeper;

#[async_trait(?Send)]
impl Sleeper for TimeoutSleeper {
    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}

/// `window.location`
pub struct WindowNavigator {
    window: Window,
}

impl WindowNavigator {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Navigator for WindowNavigator {
    fn reload(&self) {
        if let Err(e) = self.window.location().reload() {
            tracing::error!("Reload failed: {:?}", e);
        }
    }

    fn navigate(&self, path: &str) {
        if let Err(e) = self.window.location().set_href(path) {
            tracing::error!("Navigation to {} failed: {:?}", path, e);
        }
    }
}
