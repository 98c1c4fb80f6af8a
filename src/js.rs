use crate::value::{HostShape, HostValue, Value};
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

impl HostValue for JsValue {
    fn shape(&self) -> HostShape<Self> {
        if let Some(s) = self.as_string() {
            return HostShape::String(s);
        }
        if let Some(n) = self.as_f64() {
            return HostShape::Number(n);
        }
        if let Some(b) = self.as_bool() {
            return HostShape::Boolean(b);
        }
        if Array::is_array(self) {
            return HostShape::Array(Array::from(self).iter().collect());
        }
        if self.is_function() {
            return HostShape::Other;
        }
        let Some(object) = self.dyn_ref::<Object>() else {
            return HostShape::Other;
        };
        let mut entries = Vec::new();
        for key in Object::keys(object).iter() {
            let Some(name) = key.as_string() else {
                continue;
            };
            // A throwing getter reads as undefined.
            let value = Reflect::get(object, &key).unwrap_or(JsValue::UNDEFINED);
            entries.push((name, value));
        }
        HostShape::Map(entries)
    }
}

pub fn to_js(value: &Value) -> Result<JsValue, JsValue> {
    let js = match value {
        Value::Null => JsValue::NULL,
        Value::Bool(b) => JsValue::from_bool(*b),
        Value::Number(n) => JsValue::from_f64(*n),
        Value::String(s) => JsValue::from_str(s),
        Value::Array(items) => {
            let array = Array::new_with_length(items.len() as u32);
            for (i, item) in items.iter().enumerate() {
                array.set(i as u32, to_js(item)?);
            }
            array.into()
        }
        Value::Map(map) => {
            let object = Object::new();
            for (key, item) in map {
                Reflect::set(&object, &JsValue::from_str(key), &to_js(item)?)?;
            }
            object.into()
        }
    };
    Ok(js)
}
