// ============================================================================
// ELEMENT BUILDER - Builder pattern para crear elementos fácilmente
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, create_element, set_input_value, set_text_content};

pub struct ElementBuilder {
    element: Element,
}

impl ElementBuilder {
    pub fn new(tag: &str) -> Result<Self, JsValue> {
        Ok(Self {
            element: create_element(tag)?,
        })
    }

    /// Establecer class name (reemplaza todas las clases)
    pub fn class(self, class: &str) -> Self {
        self.element.set_class_name(class);
        self
    }

    pub fn id(self, id: &str) -> Result<Self, JsValue> {
        self.element.set_attribute("id", id)?;
        Ok(self)
    }

    pub fn text(self, text: &str) -> Self {
        set_text_content(&self.element, text);
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Result<Self, JsValue> {
        self.element.set_attribute(name, value)?;
        Ok(self)
    }

    /// Atributo booleano (`disabled`, `checked`...): solo se pone si `on`
    pub fn flag(self, name: &str, on: bool) -> Result<Self, JsValue> {
        if on {
            self.element.set_attribute(name, "")?;
        }
        Ok(self)
    }

    /// Valor inicial de un `<input>`
    pub fn value(self, value: &str) -> Self {
        set_input_value(&self.element, value);
        self
    }

    pub fn child(self, child: Element) -> Result<Self, JsValue> {
        append_child(&self.element, &child)?;
        Ok(self)
    }

    pub fn build(self) -> Element {
        self.element
    }
}
