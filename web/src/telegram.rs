//! Telegram WebApp bridge
//!
//! `window.Telegram.WebApp` is looked up dynamically. Missing objects and
//! methods are reported as `Unsupported`, thrown exceptions as call errors.

use coursedeck_core::{
    BridgeError, EventSink, HostBridge, HostEvent, ImpactStyle, MainButtonCommand, ThemeParams,
};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::dom::js_message;

type Result<T> = std::result::Result<T, BridgeError>;

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(key)).ok()?;
    if value.is_null() || value.is_undefined() {
        None
    } else {
        Some(value)
    }
}

pub struct TelegramBridge {
    web_app: Option<Object>,
}

impl TelegramBridge {
    /// Look up `window.Telegram.WebApp`
    pub fn detect() -> Self {
        let web_app = web_sys::window()
            .and_then(|window| get(&window, "Telegram"))
            .and_then(|telegram| get(&telegram, "WebApp"))
            .and_then(|web_app| web_app.dyn_into::<Object>().ok());

        Self { web_app }
    }

    fn web_app(&self) -> Result<&Object> {
        self.web_app.as_ref().ok_or(BridgeError::Unavailable)
    }

    /// Call `object.method(args)` where `object` is `WebApp` or one of its
    /// members
    fn call(&self, member: Option<&str>, method: &'static str, args: &[JsValue]) -> Result<JsValue> {
        let web_app: &JsValue = self.web_app()?;
        let target = match member {
            Some(member) => get(web_app, member).ok_or(BridgeError::Unsupported(method))?,
            None => web_app.clone(),
        };

        let function = get(&target, method)
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or(BridgeError::Unsupported(method))?;

        let args: Array = args.iter().collect();
        function
            .apply(&target, &args)
            .map_err(|e| BridgeError::call(method, js_message(&e)))
    }
}

impl HostBridge for TelegramBridge {
    fn is_available(&self) -> bool {
        self.web_app.is_some()
    }

    fn ready(&self) -> Result<()> {
        self.call(None, "ready", &[]).map(|_| ())
    }

    fn expand(&self) -> Result<()> {
        self.call(None, "expand", &[]).map(|_| ())
    }

    fn theme_params(&self) -> Result<Option<ThemeParams>> {
        let Some(params) = get(self.web_app()?, "themeParams") else {
            return Ok(None);
        };

        let token = |key: &str| get(&params, key).and_then(|v| v.as_string());
        Ok(Some(ThemeParams {
            bg_color: token("bg_color"),
            text_color: token("text_color"),
            button_color: token("button_color"),
            button_text_color: token("button_text_color"),
        }))
    }

    fn impact_occurred(&self, style: ImpactStyle) -> Result<()> {
        self.call(
            Some("HapticFeedback"),
            "impactOccurred",
            &[JsValue::from_str(style.as_str())],
        )
        .map(|_| ())
    }

    fn selection_changed(&self) -> Result<()> {
        self.call(Some("HapticFeedback"), "selectionChanged", &[])
            .map(|_| ())
    }

    fn send_data(&self, payload: &str) -> Result<()> {
        self.call(None, "sendData", &[JsValue::from_str(payload)])
            .map(|_| ())
    }

    fn main_button(&self, command: &MainButtonCommand) -> Result<()> {
        let result = match command {
            MainButtonCommand::SetText(text) => {
                self.call(Some("MainButton"), "setText", &[JsValue::from_str(text)])
            }
            MainButtonCommand::Show => self.call(Some("MainButton"), "show", &[]),
            MainButtonCommand::Hide => self.call(Some("MainButton"), "hide", &[]),
            MainButtonCommand::Enable => self.call(Some("MainButton"), "enable", &[]),
        };
        result.map(|_| ())
    }

    fn supports_events(&self) -> bool {
        self.web_app
            .as_ref()
            .and_then(|web_app| get(web_app, "onEvent"))
            .map(|f| f.is_function())
            .unwrap_or(false)
    }

    fn subscribe(&self, event: HostEvent, sink: EventSink) -> Result<()> {
        // Handed over to JS; lives as long as the host keeps the handler
        let handler = Closure::<dyn Fn()>::new(move || sink(event)).into_js_value();
        self.call(None, "onEvent", &[JsValue::from_str(event.as_str()), handler])
            .map(|_| ())
    }
}
