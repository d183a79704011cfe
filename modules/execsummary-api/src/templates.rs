use dioxus::prelude::VirtualDom;

/// Wrap the rendered dashboard in an HTML5 document.
pub fn render_document(dom: &VirtualDom) -> String {
    let body = dioxus::ssr::render(dom);
    format!("<!DOCTYPE html><html lang=\"en\">{body}</html>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::prelude::*;

    #[allow(non_snake_case)]
    fn Caption() -> Element {
        rsx! { p { "Last updated" } }
    }

    #[test]
    fn output_is_a_complete_document() {
        let mut dom = VirtualDom::new(Caption);
        dom.rebuild_in_place();
        let html = render_document(&dom);
        assert!(html.starts_with("<!DOCTYPE html><html lang=\"en\">"));
        assert!(html.contains("<p>Last updated</p>"));
        assert!(html.ends_with("</html>"));
    }
}
