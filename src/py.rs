use crate::value::{HostShape, HostValue, Value};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};

impl<'py> HostValue for Bound<'py, PyAny> {
    fn shape(&self) -> HostShape<Self> {
        if self.is_instance_of::<PyString>() {
            return self
                .extract::<String>()
                .map_or(HostShape::Other, HostShape::String);
        }
        // bool subclasses int
        if self.is_instance_of::<PyBool>() {
            return self
                .extract::<bool>()
                .map_or(HostShape::Other, HostShape::Boolean);
        }
        if self.is_instance_of::<PyInt>() || self.is_instance_of::<PyFloat>() {
            return self
                .extract::<f64>()
                .map_or(HostShape::Other, HostShape::Number);
        }
        if self.is_instance_of::<PyList>() || self.is_instance_of::<PyTuple>() {
            let items: PyResult<Vec<_>> = match self.try_iter() {
                Ok(iter) => iter.collect(),
                Err(_) => return HostShape::Other,
            };
            return items.map_or(HostShape::Other, HostShape::Array);
        }
        if let Ok(dict) = self.extract::<Bound<'py, PyDict>>() {
            let entries = dict
                .iter()
                .filter_map(|(key, value)| key.extract::<String>().ok().map(|k| (k, value)))
                .collect();
            return HostShape::Map(entries);
        }
        HostShape::Other
    }
}

/// Integral numbers within the exact f64 range become `int`.
pub fn to_python<'py>(py: Python<'py>, value: &Value) -> PyResult<Bound<'py, PyAny>> {
    let object = match value {
        Value::Null => py.None().into_bound(py),
        Value::Bool(b) => PyBool::new(py, *b).to_owned().into_any(),
        Value::Number(n) => match value.as_i64() {
            Some(i) => i.into_pyobject(py)?.into_any(),
            None => PyFloat::new(py, *n).into_any(),
        },
        Value::String(s) => PyString::new(py, s).into_any(),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(to_python(py, item)?)?;
            }
            list.into_any()
        }
        Value::Map(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, to_python(py, item)?)?;
            }
            dict.into_any()
        }
    };
    Ok(object)
}
