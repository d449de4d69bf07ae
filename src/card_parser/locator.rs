use log::debug;
use scraper::{ElementRef, Html, Selector};

/// One way of finding the node that holds a field on a product page.
///
/// Each locator only looks at the first node it finds, so a locator either
/// yields that node's trimmed text (or attribute) or nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Locator {
    /// Text of the first element matching the css selector.
    Text(&'static str),
    /// Text of the first element matching the selector whose text contains the needle.
    /// The needle is searched in all text below the element, child elements included,
    /// not only in the element's own text node.
    TextContaining(&'static str, &'static str),
    /// Text of the first `dd` following the first `dt` whose text contains the label.
    DefinitionFor(&'static str),
    /// An attribute of the first element matching the selector.
    Attribute(&'static str, &'static str),
}

impl Locator {
    pub fn locate(&self, document: &Html) -> Option<String> {
        match *self {
            Locator::Text(selector) => select_first(document, selector, |_| true).map(element_text),
            Locator::TextContaining(selector, needle) => {
                select_first(document, selector, |element| element_text(element).contains(needle))
                    .map(element_text)
            }
            Locator::DefinitionFor(label) => {
                let term = select_first(document, "dt", |element| {
                    element_text(element).contains(label)
                })?;
                term.next_siblings()
                    .filter_map(ElementRef::wrap)
                    .find(|sibling| sibling.value().name() == "dd")
                    .map(element_text)
            }
            Locator::Attribute(selector, attribute) => {
                select_first(document, selector, |_| true)?
                    .value()
                    .attr(attribute)
                    .map(|value| value.trim().to_string())
            }
        }
    }
}

/// Runs the locators in order and returns the first value `accept` turns into `Some`.
/// A locator that misses, or whose value is rejected, simply hands over to the next one.
pub fn first_match<T>(
    document: &Html,
    locators: &[Locator],
    accept: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    locators.iter().find_map(|locator| {
        let value = locator.locate(document)?;
        let accepted = accept(&value);
        if accepted.is_none() {
            debug!("Locator {:?} matched '{}' but it was rejected", locator, value);
        }
        accepted
    })
}

/// Accepts any non-empty value unchanged.
pub fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn select_first<'a>(
    document: &'a Html,
    selector: &str,
    predicate: impl Fn(ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    let selector = match Selector::parse(selector) {
        Ok(selector) => selector,
        Err(e) => {
            debug!("Invalid selector '{}': {:?}", selector, e);
            return None;
        }
    };
    document.select(&selector).find(|element| predicate(*element))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Html {
        Html::parse_document(
            r#"<html><body>
                <h1 class="title"> Charizard </h1>
                <span>Ranking</span>
                <span>Card #4</span>
                <dl>
                    <dt>Printed in</dt><dd>Base Set</dd>
                    <dt>Number</dt><!-- comment --><dd>004/102</dd>
                </dl>
                <img class="product-image big" src=" /img/4.jpg ">
            </body></html>"#,
        )
    }

    #[test]
    fn test_text_locator_takes_first_element() {
        assert_eq!(
            Locator::Text("h1").locate(&document()),
            Some("Charizard".to_string())
        );
        assert_eq!(Locator::Text("h2").locate(&document()), None);
    }

    #[test]
    fn test_text_containing() {
        assert_eq!(
            Locator::TextContaining("span", "#").locate(&document()),
            Some("Card #4".to_string())
        );
        assert_eq!(Locator::TextContaining("span", "€").locate(&document()), None);
    }

    #[test]
    fn test_text_containing_looks_into_child_elements() {
        let document = Html::parse_document(
            r#"<html><body><div class="price"><span>€</span> 2,50</div></body></html>"#,
        );
        assert_eq!(
            Locator::TextContaining("div", "€").locate(&document),
            Some("€ 2,50".to_string())
        );
    }

    #[test]
    fn test_definition_for_skips_non_element_siblings() {
        assert_eq!(
            Locator::DefinitionFor("Number").locate(&document()),
            Some("004/102".to_string())
        );
        assert_eq!(Locator::DefinitionFor("Rarity").locate(&document()), None);
    }

    #[test]
    fn test_attribute() {
        assert_eq!(
            Locator::Attribute("img[class*='product-image']", "src").locate(&document()),
            Some("/img/4.jpg".to_string())
        );
        assert_eq!(
            Locator::Attribute("img[class*='product-image']", "alt").locate(&document()),
            None
        );
    }

    #[test]
    fn test_invalid_selector_is_a_miss() {
        assert_eq!(Locator::Text("h1[[").locate(&document()), None);
    }

    #[test]
    fn test_first_match_falls_through_rejected_values() {
        let locators = [
            Locator::Text("h2"),
            Locator::Text("span"),
            Locator::TextContaining("span", "#"),
        ];
        let found = first_match(&document(), &locators, |text| {
            text.contains('#').then(|| text.to_string())
        });
        assert_eq!(found, Some("Card #4".to_string()));
    }
}
