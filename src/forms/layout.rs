use serde_derive::Serialize;
use tera::escape_html;

/// One entry of a form's layout.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutItem {
    /// The field of the given name.
    Field { name: &'static str },

    /// A raw HTML fragment.
    Html { html: String },

    /// A `<div>` around other items.
    Div { items: Vec<LayoutItem> },

    /// A submit button.
    Submit {
        name: &'static str,
        value: String,
        css_class: String,
    },
}

impl LayoutItem {
    /// A raw HTML fragment.
    pub fn html(html: impl Into<String>) -> LayoutItem {
        LayoutItem::Html { html: html.into() }
    }

    /// A submit button.
    pub fn submit(name: &'static str, value: &str, css_class: &str) -> LayoutItem {
        LayoutItem::Submit {
            name,
            value: value.to_string(),
            css_class: css_class.to_string(),
        }
    }
}

impl From<&'static str> for LayoutItem {
    fn from(name: &'static str) -> LayoutItem {
        LayoutItem::Field { name }
    }
}

/// The order in which a form's fields, buttons and other markup are shown.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Layout {
    items: Vec<LayoutItem>,
}

impl Layout {
    /// Creates a layout from the given items.
    pub fn new(items: Vec<LayoutItem>) -> Layout {
        Layout { items }
    }

    /// The top-level items.
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    /// Appends an item.
    pub fn push(&mut self, item: impl Into<LayoutItem>) {
        self.items.push(item.into())
    }

    /// Inserts an item before the given index. An index past the end appends.
    pub fn insert(&mut self, index: usize, item: impl Into<LayoutItem>) {
        let index = index.min(self.items.len());
        self.items.insert(index, item.into())
    }

    /// The index of the top-level item showing the given field.
    pub fn position_of(&self, field: &str) -> Option<usize> {
        self.items.iter().position(|item| match item {
            LayoutItem::Field { name } => *name == field,
            _ => false,
        })
    }

    /// Removes the given field wherever it is shown. Returns whether it was found.
    pub fn remove_field(&mut self, field: &str) -> bool {
        fn remove(items: &mut Vec<LayoutItem>, field: &str) -> bool {
            let before = items.len();
            items.retain(|item| match item {
                LayoutItem::Field { name } => *name != field,
                _ => true,
            });
            let mut found = items.len() != before;
            for item in items.iter_mut() {
                if let LayoutItem::Div { items } = item {
                    found |= remove(items, field);
                }
            }
            found
        }
        remove(&mut self.items, field)
    }

    /// The names of all fields shown, in order.
    pub fn field_names(&self) -> Vec<&'static str> {
        fn collect(items: &[LayoutItem], out: &mut Vec<&'static str>) {
            for item in items {
                match item {
                    LayoutItem::Field { name } => out.push(*name),
                    LayoutItem::Div { items } => collect(items, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.items, &mut out);
        out
    }
}

/// The green "save" submit button.
pub fn save_button() -> LayoutItem {
    LayoutItem::html(SAVE_BUTTON)
}

/// The "save" button followed by a link back to `cancel_url`.
pub fn save_and_cancel(cancel_url: &str) -> LayoutItem {
    LayoutItem::html(format!("{}{}", SAVE_BUTTON, cancel_link_html(cancel_url)))
}

/// A link back to `url`, styled as a button.
pub fn cancel_link(url: &str) -> LayoutItem {
    LayoutItem::html(cancel_link_html(url))
}

/// A red link to a deletion page, right-aligned.
pub fn delete_link(url: &str, label: &str) -> LayoutItem {
    LayoutItem::html(format!(
        "<a class=\"btn btn-danger pull-right\" style=\"color:whitesmoke;\" href=\"{}\" \
         role=\"button\"><span class=\"glyphicon glyphicon-trash\"></span> {}</a>",
        url,
        escape_html(label)
    ))
}

/// A heading above the form.
pub fn heading(text: &str) -> LayoutItem {
    LayoutItem::html(format!("<h3>{}</h3>", escape_html(text)))
}

/// An italic note above the form.
pub fn notice(text: &str) -> LayoutItem {
    LayoutItem::html(format!("<p><i>{}</i></p>", escape_html(text)))
}

const SAVE_BUTTON: &str = "<button class=\"btn btn-success\" type=\"submit\" name=\"save\">\
                           <span class=\"glyphicon glyphicon-ok\"></span> Speichern</button> ";

fn cancel_link_html(url: &str) -> String {
    format!(
        "<a class=\"btn btn-warning\" href=\"{}\" role=\"button\">\
         <span class=\"glyphicon glyphicon-remove\"></span> Abbrechen</a> ",
        url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Layout {
        Layout::new(vec![
            "name".into(),
            LayoutItem::Div {
                items: vec!["comment".into()],
            },
            save_button(),
        ])
    }

    #[test]
    fn insert_past_the_end_appends() {
        let mut layout = sample();
        layout.insert(42, "late");
        assert_eq!(layout.items().last(), Some(&LayoutItem::from("late")));
        layout.insert(0, "early");
        assert_eq!(layout.field_names(), vec!["early", "name", "comment", "late"]);
    }

    #[test]
    fn remove_field_looks_into_divs() {
        let mut layout = sample();
        assert!(layout.remove_field("comment"));
        assert!(!layout.remove_field("comment"));
        assert_eq!(layout.field_names(), vec!["name"]);
        assert_eq!(layout.position_of("name"), Some(0));
    }

    #[test]
    fn html_helpers_escape() {
        match heading("<Bar & Küche>") {
            LayoutItem::Html { html } => assert_eq!(html, "<h3>&lt;Bar &amp; Küche&gt;</h3>"),
            item => panic!("not html: {:?}", item),
        }
        match save_and_cancel("/config") {
            LayoutItem::Html { html } => {
                assert!(html.contains("name=\"save\""));
                assert!(html.contains("href=\"/config\""));
            }
            item => panic!("not html: {:?}", item),
        }
    }
}
