use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventTarget, HtmlMetaElement, HtmlTextAreaElement, KeyboardEvent, PageTransitionEvent, Window};

use super::dom::{
    self, BannerNotifier, ButtonHandle, ContainerView, DELETE_BUTTON_SELECTOR, DocumentListView,
    ITEM_SELECTOR, TextAreaInput, TimeoutSleeper, WindowConfirmer, WindowNavigator,
};
use crate::app::composer::Composer;
use crate::app::detail::DetailPage;
use crate::app::history::HistoryManager;
use crate::app::transcript::{SharedTranscript, Transcript};
use crate::config::{CONFIG_META_NAME, ClientConfig};
use crate::shared::errors::{ClientError, Result};
use crate::shared::logging::{self, LogOperation};
use crate::shared::services::ApiService;
use crate::shared::storage::{InMemoryStorage, LocalStorage};
use crate::shared::traits::{KeyValueStore, SystemClock};

pub const CHAT_INPUT_ID: &str = "chatText";
pub const CHAT_SEND_ID: &str = "chatSend";
pub const CHAT_CONTAINER_ID: &str = "chatMessages";
pub const CLEAR_ALL_ID: &str = "clearAllChatsBtn";
pub const DETAIL_DELETE_ID: &str = "deleteConversationBtn";
pub const DETAIL_CLEAR_ID: &str = "clearMessagesBtn";

thread_local! {
    static HISTORY_PAGE: RefCell<Option<HistoryPage>> = const { RefCell::new(None) };
}

/// Attach an owned closure that lives as long as the page
fn listen<E, F>(target: &EventTarget, event: &str, handler: F) -> Result<()>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Wire every controller whose elements are on this page
pub fn start() -> Result<()> {
    logging::init();

    let window = dom::window()?;
    let document = dom::document()?;
    let config = read_config(&document);
    let api = Rc::new(ApiService::from_config(&config));

    describe_page(&document);

    if let Some(transcript) = init_transcript(&window, &document, &config)? {
        init_composer(&document, transcript, api.clone())?;
    }
    init_history_page(&window, &document, &config, api.clone())?;
    init_detail_page(&window, &document, &config, api)?;

    Ok(())
}

/// `<meta name="cinechat-config" content="{...}">`, defaults when absent or invalid
fn read_config(document: &Document) -> ClientConfig {
    let selector = format!("meta[name=\"{}\"]", CONFIG_META_NAME);
    let content = document
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlMetaElement>().ok())
        .map(|meta| meta.content());

    match content {
        Some(raw) => ClientConfig::from_json(&raw).unwrap_or_else(|e| {
            tracing::warn!(
                operation = LogOperation::PageSetup.as_str(),
                error = %e,
                "Ignoring page configuration"
            );
            ClientConfig::default()
        }),
        None => ClientConfig::default(),
    }
}

/// Log which integration points the page exposes
pub fn describe_page(document: &Document) {
    let has = |id: &str| document.get_element_by_id(id).is_some();
    let count = |selector: &str| {
        document
            .query_selector_all(selector)
            .map(|nodes| nodes.length())
            .unwrap_or(0)
    };

    tracing::debug!(
        operation = LogOperation::PageSetup.as_str(),
        chat_input = has(CHAT_INPUT_ID),
        chat_send = has(CHAT_SEND_ID),
        chat_container = has(CHAT_CONTAINER_ID),
        clear_all = has(CLEAR_ALL_ID),
        delete_buttons = count(DELETE_BUTTON_SELECTOR),
        conversation_items = count(ITEM_SELECTOR),
        detail_delete = has(DETAIL_DELETE_ID),
        detail_clear = has(DETAIL_CLEAR_ID),
        "Page elements"
    );
}

fn init_transcript(
    window: &Window,
    document: &Document,
    config: &ClientConfig,
) -> Result<Option<SharedTranscript>> {
    let Some(container) = document.get_element_by_id(CHAT_CONTAINER_ID) else {
        return Ok(None);
    };

    let storage: Rc<dyn KeyValueStore> = match LocalStorage::open() {
        Some(storage) => Rc::new(storage),
        None => {
            tracing::warn!(
                operation = LogOperation::TranscriptLoad.as_str(),
                "localStorage unavailable, transcript will not survive reloads"
            );
            Rc::new(InMemoryStorage::new())
        }
    };

    let view = Rc::new(ContainerView::new(document.clone(), container));
    let transcript = Transcript::new(storage, view, Rc::new(SystemClock), config.storage_key.clone())
        .into_shared();
    transcript.borrow_mut().load();

    let flush_target = transcript.clone();
    listen(window, "beforeunload", move |_: Event| {
        if let Err(e) = flush_target.borrow().flush() {
            logging::log_transcript_persist_error(flush_target.borrow().storage_key(), &e.to_string());
        }
    })?;

    Ok(Some(transcript))
}

fn init_composer(document: &Document, transcript: SharedTranscript, api: Rc<ApiService>) -> Result<()> {
    let (Some(input), Some(send)) = (
        document.get_element_by_id(CHAT_INPUT_ID),
        document.get_element_by_id(CHAT_SEND_ID),
    ) else {
        return Ok(());
    };
    let input = input
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| ClientError::MissingElement(format!("#{} is not a textarea", CHAT_INPUT_ID)))?;

    let composer = Rc::new(Composer::new(
        Rc::new(TextAreaInput::new(input.clone())),
        transcript,
        api,
    ));

    let on_click = composer.clone();
    listen(&send, "click", move |_: Event| {
        let composer = on_click.clone();
        spawn_local(async move {
            composer.submit().await;
        });
    })?;

    let on_key = composer.clone();
    listen(&input, "keypress", move |e: KeyboardEvent| {
        if Composer::is_submit_key(&e.key(), e.shift_key()) {
            e.prevent_default();
            let composer = on_key.clone();
            spawn_local(async move {
                composer.submit().await;
            });
        }
    })?;

    listen(&input, "input", move |_: Event| composer.on_input())?;
    Ok(())
}

/// Delegated click handler plus the manager it feeds.
///
/// Dropping the page removes the document listener and tears down the
/// bound item set if `pagehide` has not already done so.
struct HistoryPage {
    manager: Rc<HistoryManager>,
    document: Document,
    on_click: Closure<dyn FnMut(Event)>,
}

impl Drop for HistoryPage {
    fn drop(&mut self) {
        let _ = self
            .document
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref());
        self.manager.list().teardown();
    }
}

fn delete_button_from(event: &Event) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(DELETE_BUTTON_SELECTOR)
        .ok()
        .flatten()
}

fn init_history_page(
    window: &Window,
    document: &Document,
    config: &ClientConfig,
    api: Rc<ApiService>,
) -> Result<()> {
    let clear_all = document.get_element_by_id(CLEAR_ALL_ID);
    let list_view = DocumentListView::new(document.clone());
    let ids = list_view.conversation_ids();
    let has_items = list_view_has_items(document);
    if clear_all.is_none() && ids.is_empty() && !has_items {
        return Ok(());
    }

    let manager = Rc::new(HistoryManager::new(
        api,
        Rc::new(list_view),
        Rc::new(BannerNotifier::new(document.clone())),
        Rc::new(WindowConfirmer::new(window.clone())),
        Rc::new(TimeoutSleeper),
        Rc::new(WindowNavigator::new(window.clone())),
        config.clone(),
    ));
    for id in &ids {
        manager.list().bind(id);
    }

    if let Some(button) = clear_all {
        let on_clear = manager.clone();
        let target = button.clone();
        listen(&button, "click", move |e: Event| {
            e.prevent_default();
            let manager = on_clear.clone();
            let button = ButtonHandle::new(target.clone());
            spawn_local(async move {
                manager.delete_all(&button).await;
            });
        })?;
    }

    let on_item = manager.clone();
    let on_click = Closure::wrap(Box::new(move |e: Event| {
        let Some(target) = delete_button_from(&e) else {
            return;
        };
        e.prevent_default();
        let button = ButtonHandle::new(target);
        let manager = on_item.clone();
        spawn_local(async move {
            let id = button.conversation_id();
            manager.delete_one(&id, &button).await;
        });
    }) as Box<dyn FnMut(Event)>);
    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

    HISTORY_PAGE.with(|page| {
        *page.borrow_mut() = Some(HistoryPage {
            manager,
            document: document.clone(),
            on_click,
        });
    });

    listen(window, "pagehide", |e: PageTransitionEvent| {
        let released = HISTORY_PAGE.with(|page| {
            page.borrow()
                .as_ref()
                .and_then(|p| p.manager.list().page_hidden(e.persisted()))
        });
        if let Some(released) = released {
            tracing::debug!(
                operation = LogOperation::PageSetup.as_str(),
                released = released,
                "Conversation list torn down"
            );
            HISTORY_PAGE.with(|page| page.borrow_mut().take());
        }
    })?;

    Ok(())
}

fn list_view_has_items(document: &Document) -> bool {
    document.query_selector(ITEM_SELECTOR).ok().flatten().is_some()
}

fn init_detail_page(
    window: &Window,
    document: &Document,
    config: &ClientConfig,
    api: Rc<ApiService>,
) -> Result<()> {
    let delete = document.get_element_by_id(DETAIL_DELETE_ID);
    let clear = document.get_element_by_id(DETAIL_CLEAR_ID);
    if delete.is_none() && clear.is_none() {
        return Ok(());
    }

    let page = Rc::new(DetailPage::new(
        api,
        Rc::new(BannerNotifier::new(document.clone())),
        Rc::new(WindowConfirmer::new(window.clone())),
        Rc::new(TimeoutSleeper),
        Rc::new(WindowNavigator::new(window.clone())),
        config.clone(),
    ));

    if let Some(button) = delete {
        let on_delete = page.clone();
        let source = ButtonHandle::new(button.clone());
        listen(&button, "click", move |_: Event| {
            let page = on_delete.clone();
            let id = source.conversation_id();
            spawn_local(async move {
                page.delete_conversation(&id).await;
            });
        })?;
    }

    if let Some(button) = clear {
        let source = ButtonHandle::new(button.clone());
        listen(&button, "click", move |_: Event| {
            let page = page.clone();
            let id = source.conversation_id();
            spawn_local(async move {
                page.clear_messages(&id).await;
            });
        })?;
    }

    Ok(())
}
