//! Reading the files chosen in an `<input type="file">`.

use crate::capture::SelectedFile;

/// Files currently selected in the input with `input_id`. The input is
/// cleared afterwards so picking the same file again fires `change`.
#[cfg(target_arch = "wasm32")]
pub async fn read_selected(input_id: &str) -> Result<Vec<SelectedFile>, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlInputElement;

    let input: HtmlInputElement = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(input_id))
        .ok_or_else(|| format!("file input {input_id} not found"))?
        .dyn_into()
        .map_err(|_| format!("{input_id} is not an input element"))?;

    let mut selected = Vec::new();
    if let Some(files) = input.files() {
        for index in 0..files.length() {
            let Some(file) = files.get(index) else {
                continue;
            };
            let buffer = JsFuture::from(file.array_buffer())
                .await
                .map_err(|e| format!("reading {} failed: {e:?}", file.name()))?;
            selected.push(SelectedFile {
                name: file.name(),
                content_type: file.type_(),
                bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
            });
        }
    }
    input.set_value("");
    Ok(selected)
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn read_selected(_input_id: &str) -> Result<Vec<SelectedFile>, String> {
    Err("File selection is only available in the browser".to_string())
}
