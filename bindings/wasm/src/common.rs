use anyhow::{anyhow, Result};
use js_sys::{Object, Reflect, Uint8Array};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize to plain JS objects (no `Map`s), matching what `JSON.parse` would give.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).map_err(|e| e.into())
}

pub(crate) fn from_js(value: JsValue) -> Result<serde_json::Value, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| e.into())
}

/// Convert a JS object { "https://...": Uint8Array, ... } into (url, bytes) pairs.
pub(crate) fn js_documents(docs: JsValue) -> Result<Vec<(String, Vec<u8>)>> {
    let obj: Object = docs.dyn_into().map_err(|_| anyhow!("documents must be an object"))?;
    let keys = Object::keys(&obj);

    let mut out = Vec::with_capacity(keys.length() as usize);
    for i in 0..keys.length() {
        let k = keys.get(i).as_string().ok_or_else(|| anyhow!("non-string key"))?;
        let v = Reflect::get(&obj, &JsValue::from_str(&k))
            .map_err(|e| anyhow!("error getting property '{}': {:?}", k, e))?;

        // Accept Uint8Array-like values
        let u8arr = Uint8Array::new(&v);
        let mut buf = vec![0u8; u8arr.length() as usize];
        u8arr.copy_to(&mut buf[..]);

        out.push((k, buf));
    }
    Ok(out)
}
