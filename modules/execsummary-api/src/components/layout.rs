use dioxus::prelude::*;

/// Page shell: head, stylesheet and a centred content column.
#[allow(non_snake_case)]
#[component]
pub fn Layout(title: String, children: Element) -> Element {
    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{title}" }
            script { src: "https://cdn.tailwindcss.com" }
        }
        body { class: "min-h-screen bg-gray-100 font-sans text-gray-900 py-8",
            div { class: "max-w-5xl mx-auto px-4",
                {children}
            }
        }
    }
}
