use serde_json::Value;
use strum::IntoEnumIterator;

/// Section containers seen under `sectionListRenderer.contents`.
///
/// Declaration order is detection priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::IntoStaticStr, strum_macros::EnumIter)]
pub enum SectionShape {
    #[strum(serialize = "gridRenderer")]
    Grid,
    #[strum(serialize = "musicCarouselShelfRenderer")]
    Carousel,
    #[strum(serialize = "musicImmersiveCarouselShelfRenderer")]
    ImmersiveCarousel,
}

impl SectionShape {
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Key under the container that holds its items.
    pub fn items_key(self) -> &'static str {
        match self {
            SectionShape::Grid => "items",
            SectionShape::Carousel | SectionShape::ImmersiveCarousel => "contents",
        }
    }

    /// Key presence only. Non-object sections match nothing.
    pub fn detect(section: &Value) -> Option<Self> {
        let map = section.as_object()?;
        Self::iter().find(|shape| map.contains_key(shape.key()))
    }
}

/// Item renderers that can describe a playlist card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::IntoStaticStr, strum_macros::EnumIter)]
pub enum ItemShape {
    #[strum(serialize = "musicTwoRowItemRenderer")]
    TwoRowItem,
    #[strum(serialize = "musicResponsiveListItemRenderer")]
    ResponsiveListItem,
    #[strum(serialize = "musicNavigationButtonRenderer")]
    NavigationButton,
}

impl ItemShape {
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn detect(item: &Value) -> Option<Self> {
        let map = item.as_object()?;
        Self::iter().find(|shape| map.contains_key(shape.key()))
    }
}
