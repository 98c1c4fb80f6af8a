#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
use pyo3::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod ast;
pub mod bridge;
pub mod convert;
pub mod error;
pub mod parser;
pub mod restore;
pub mod tokenizer;
pub mod value;
pub mod wire;

#[cfg(target_arch = "wasm32")]
mod js;
#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
mod py;

pub use bridge::{parse, parse_nodes, restore, restore_nodes, restore_value, BridgeOptions};
pub use error::{BridgeError, ParseError};
pub use value::{HostShape, HostValue, Value};
pub use wire::{NodeKind, WireNode, SCHEMA_VERSION};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = parse)]
pub fn parse_wasm(text: &str) -> Result<JsValue, JsValue> {
    let value = bridge::parse(text, &BridgeOptions::default())
        .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))?;
    js::to_js(&value)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = restore)]
pub fn restore_wasm(nodes: JsValue) -> Result<Option<String>, JsValue> {
    bridge::restore(nodes, &BridgeOptions::default())
        .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = schemaVersion)]
pub fn schema_version_wasm() -> u32 {
    SCHEMA_VERSION
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
#[pyo3(name = "parse")]
fn parse_py<'py>(py: Python<'py>, text: &str) -> PyResult<Bound<'py, PyAny>> {
    let value = bridge::parse(text, &BridgeOptions::default())
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))?;
    py::to_python(py, &value)
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
#[pyo3(name = "restore")]
fn restore_py(nodes: &Bound<'_, PyAny>) -> PyResult<Option<String>> {
    bridge::restore(nodes.clone(), &BridgeOptions::default())
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pymodule]
fn markbridge(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_py, m)?)?;
    m.add_function(wrap_pyfunction!(restore_py, m)?)?;
    m.add("SCHEMA_VERSION", SCHEMA_VERSION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

    fn run_fixture(input_path: &Path) {
        let golden_path = format!("{}.golden.json", input_path.display());
        let input = fs::read_to_string(input_path).expect("Failed to read input");
        let golden = fs::read_to_string(&golden_path).expect("Failed to read golden");

        let options = BridgeOptions::default();
        let output = parse(&input, &options).unwrap();
        let v_out = serde_json::to_value(&output).unwrap();
        let v_golden: serde_json::Value = serde_json::from_str(&golden).unwrap();

        if v_out != v_golden {
            let out = v_out.as_array().unwrap();
            let exp = v_golden.as_array().unwrap();
            for (i, (a, b)) in out.iter().zip(exp.iter()).enumerate() {
                if a != b {
                    println!("Mismatch at node index {}", i);
                    println!("Got: {}", serde_json::to_string_pretty(a).unwrap());
                    println!("Exp: {}", serde_json::to_string_pretty(b).unwrap());
                    break;
                }
            }
            assert_eq!(v_out, v_golden, "Mismatch in fixture {}", input_path.display());
        }

        let restored = restore(&v_golden, &options)
            .unwrap()
            .expect("golden output is an array");
        let reparsed = serde_json::to_value(parse(&restored, &options).unwrap()).unwrap();
        assert_eq!(
            reparsed,
            v_golden,
            "Restored fixture {} parses differently",
            input_path.display()
        );
    }

    #[test]
    fn test_fixtures() {
        let fixtures_path = Path::new(FIXTURES).join("fixtures.json");
        let fixtures_text =
            fs::read_to_string(&fixtures_path).expect("Failed to read fixtures.json");
        let fixtures: serde_json::Value =
            serde_json::from_str(&fixtures_text).expect("Invalid fixtures.json");
        let names = fixtures
            .as_array()
            .expect("fixtures.json must be an array");

        for name in names {
            let name = name.as_str().expect("fixture names are strings");
            run_fixture(&Path::new(FIXTURES).join(name));
        }
    }

    #[test]
    fn schema_version_is_exported() {
        assert_eq!(SCHEMA_VERSION, 1);
        assert_eq!(wire::PAYLOAD_FIELD, "value");
    }
}
