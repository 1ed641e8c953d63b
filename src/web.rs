//! # Page Bindings
//!
//! Entry points the login page calls from its buttons:
//!
//! ```html
//! <input id="username">
//! <button onclick="wasm.register_passkey()">Register</button>
//! <button onclick="wasm.login_passkey()">Login</button>
//! <p id="flash_message" class="hidden"></p>
//! ```
//!
//! One client is kept per page so a second click while a ceremony is pending
//! is turned away instead of starting an overlapping ceremony.

use crate::config::{ClientConfig, Variant};
use crate::feedback::Feedback;
use crate::state::PasskeyClient;
use crate::transport::HttpTransport;
use crate::webauthn::browser::BrowserCeremony;
use reqwest::Url;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlInputElement};

const USERNAME_INPUT_ID: &str = "username";
const FLASH_MESSAGE_ID: &str = "flash_message";

const HIDDEN_CLASS: &str = "hidden";
const SUCCESS_CLASS: &str = "text-green-600";
const ERROR_CLASS: &str = "text-red-600";

/// The page's flash-message element.
///
/// Text is written with `textContent`, never `innerHTML`: the not-found
/// message echoes a server body.
pub struct DomFlashMessage {
    element: Element,
}

impl DomFlashMessage {
    pub fn by_id(id: &str) -> Option<Self> {
        let element = web_sys::window()?.document()?.get_element_by_id(id)?;
        Some(DomFlashMessage { element })
    }

    fn apply(&self, tone_class: Option<&str>, message: &str) {
        let classes = self.element.class_list();
        let mut result = classes.remove_2(SUCCESS_CLASS, ERROR_CLASS);

        if let Some(class) = tone_class {
            result = result
                .and_then(|_| classes.add_1(class))
                .and_then(|_| classes.remove_1(HIDDEN_CLASS));
        } else if message.is_empty() {
            result = result.and_then(|_| classes.add_1(HIDDEN_CLASS));
        } else {
            result = result.and_then(|_| classes.remove_1(HIDDEN_CLASS));
        }

        if let Err(e) = result {
            tracing::error!("flash message class update failed: {:?}", e);
        }
        self.element.set_text_content(Some(message));
    }
}

impl Feedback for DomFlashMessage {
    fn clear(&self) {
        self.apply(None, "");
    }

    fn show_neutral(&self, message: &str) {
        self.apply(None, message);
    }

    fn show_success(&self, message: &str) {
        self.apply(Some(SUCCESS_CLASS), message);
    }

    fn show_error(&self, message: &str) {
        self.apply(Some(ERROR_CLASS), message);
    }
}

type PageClient = PasskeyClient<HttpTransport, BrowserCeremony, DomFlashMessage>;

thread_local! {
    static VARIANT: RefCell<Variant> = RefCell::new(Variant::Live);
    static CLIENT: RefCell<Option<Rc<PageClient>>> = RefCell::new(None);
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn build_client() -> Result<PageClient, JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no window available"))?;
    let origin = window.location().origin()?;
    let base_url = Url::parse(&origin).map_err(js_error)?;

    let config = ClientConfig::new(base_url, VARIANT.with(|v| *v.borrow()));
    let transport = HttpTransport::from_config(&config).map_err(js_error)?;
    let feedback = DomFlashMessage::by_id(FLASH_MESSAGE_ID)
        .ok_or_else(|| js_error(format!("missing #{} element", FLASH_MESSAGE_ID)))?;

    Ok(PasskeyClient::new(&config, transport, BrowserCeremony, feedback))
}

fn page_client() -> Result<Rc<PageClient>, JsValue> {
    CLIENT.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = Rc::new(build_client()?);
        *slot = Some(client.clone());
        Ok(client)
    })
}

fn read_username() -> Result<String, JsValue> {
    let input = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(USERNAME_INPUT_ID))
        .ok_or_else(|| js_error(format!("missing #{} element", USERNAME_INPUT_ID)))?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| js_error("username element is not an input"))?;
    Ok(input.value())
}

#[wasm_bindgen(start)]
pub fn start() {
    crate::telemetry::init_tracing();
}

/// Switch endpoint names and wording (`"live"` or `"mockup"`).
#[wasm_bindgen]
pub fn configure_passkeys(variant: &str) -> Result<(), JsValue> {
    let variant: Variant = variant.parse().map_err(js_error)?;
    VARIANT.with(|v| *v.borrow_mut() = variant);
    CLIENT.with(|slot| slot.borrow_mut().take());
    Ok(())
}

#[wasm_bindgen]
pub async fn register_passkey() -> Result<(), JsValue> {
    let client = page_client()?;
    let username = read_username()?;
    let done = client.register(&username).await;
    tracing::debug!(state = ?done, "registration finished");
    Ok(())
}

#[wasm_bindgen]
pub async fn login_passkey() -> Result<(), JsValue> {
    let client = page_client()?;
    let username = read_username()?;
    let done = client.login(&username).await;
    tracing::debug!(state = ?done, "login finished");
    Ok(())
}
