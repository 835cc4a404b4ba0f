#![cfg(target_arch = "wasm32")]
use js_sys::{Object, Reflect};
use threesixty_wasm::{abi_version, Threesixty};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn options(total_frames: u32) -> JsValue {
    let obj = Object::new();
    Reflect::set(&obj, &"totalFrames".into(), &JsValue::from(total_frames)).unwrap();
    Reflect::set(&obj, &"imagePath".into(), &"/does-not-exist/".into()).unwrap();
    obj.into()
}

fn mount(id: &str) -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    el.set_id(id);
    document.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn missing_element_is_inert() {
    let viewer = Threesixty::new(JsValue::from_str("#nowhere"), JsValue::UNDEFINED).unwrap();
    assert!(!viewer.attached());
    assert!(!viewer.ready());
    assert_eq!(viewer.current_index(), None);
    viewer.refresh();
}

#[wasm_bindgen_test]
fn zero_frames_is_an_error() {
    mount("zero-frames");
    let result = Threesixty::new(JsValue::from_str("#zero-frames"), options(0));
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn attaches_and_requests_first_frame() {
    let root = mount("three-frames");
    let viewer = Threesixty::new(root.clone().into(), options(3)).unwrap();
    assert!(viewer.attached());
    assert!(!viewer.ready());
    assert_eq!(viewer.loaded_count(), 0);

    // an image list was created with exactly one pending <img>
    let imgs = root.query_selector_all("img").unwrap();
    assert_eq!(imgs.length(), 1);
    assert_eq!(root.style().get_property_value("width").unwrap(), "300px");
}

#[wasm_bindgen_test]
fn console_logger_is_installed_once() {
    mount("logger-a");
    mount("logger-b");
    let _a = Threesixty::new(JsValue::from_str("#logger-a"), options(2)).unwrap();
    let _b = Threesixty::new(JsValue::from_str("#logger-b"), options(2)).unwrap();
    assert!(log::max_level() >= log::LevelFilter::Warn);
    assert!(log::log_enabled!(log::Level::Error));
}

#[wasm_bindgen_test]
fn drop_detaches_image_handlers() {
    let root = mount("dropped");
    let viewer = Threesixty::new(root.clone().into(), options(3)).unwrap();
    let img = root
        .query_selector("img")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    assert!(img.onload().is_some());
    assert!(img.onerror().is_some());

    drop(viewer);
    assert!(img.onload().is_none());
    assert!(img.onerror().is_none());
}

#[wasm_bindgen_test]
fn listener_receives_events() {
    let root = mount("listened");
    let mut viewer = Threesixty::new(root.into(), options(3)).unwrap();
    let sink = js_sys::Array::new();
    let push = js_sys::Function::new_with_args("e", "this.push(e)").bind(&sink);
    viewer.on_event(push);

    // an idle loop starts on refresh and reports it
    viewer.refresh();
    assert_eq!(sink.length(), 1);
    assert_eq!(sink.get(0).as_string().as_deref(), Some("AnimationStarted"));
}
