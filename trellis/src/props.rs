// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in element kinds and their dependency properties.

use std::sync::Arc;

use kurbo::Insets;
use peniko::{Brush, Color};
use trellis_layout::{Alignment, Orientation, TrackDefinition};
use trellis_property::{
    KindId, Property, PropertyError, PropertyFlags, PropertyKey, PropertyMetadata,
    PropertyMetadataBuilder, PropertyRegistry, PropertyValue, Validator,
};

use crate::ElementId;
use crate::template::TemplateHandle;

/// Kinds registered by every [`Ui`](crate::Ui).
///
/// ```text
/// Element
/// ├── Panel
/// │   ├── Grid
/// │   └── StackPanel
/// ├── Border
/// ├── Rectangle
/// ├── ContentPresenter
/// └── Control
///     └── Window
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Kinds {
    /// Root of all element kinds.
    pub element: KindId,
    /// Element that lays out several children.
    pub panel: KindId,
    /// Panel sizing children into rows and columns.
    pub grid: KindId,
    /// Panel stacking children along one axis.
    pub stack_panel: KindId,
    /// Decorator drawing a background and border around one child.
    pub border: KindId,
    /// Filled and stroked rectangle.
    pub rectangle: KindId,
    /// Host of a single content element.
    pub content_presenter: KindId,
    /// Element whose visual children come from a template.
    pub control: KindId,
    /// Top-level control bound to a native window.
    pub window: KindId,
}

/// Properties registered by every [`Ui`](crate::Ui).
#[derive(Copy, Clone, Debug)]
pub struct Props {
    /// Explicit width; `None` sizes to content.
    pub width: Property<Option<f64>>,
    /// Explicit height; `None` sizes to content.
    pub height: Property<Option<f64>>,
    /// Lower width clamp.
    pub min_width: Property<f64>,
    /// Upper width clamp.
    pub max_width: Property<f64>,
    /// Lower height clamp.
    pub min_height: Property<f64>,
    /// Upper height clamp.
    pub max_height: Property<f64>,
    /// Space reserved around the element inside its slot.
    pub margin: Property<Insets>,
    /// Horizontal placement inside the slot.
    pub horizontal_alignment: Property<Alignment>,
    /// Vertical placement inside the slot.
    pub vertical_alignment: Property<Alignment>,
    /// Hidden elements take no space and are not drawn.
    pub is_visible: Property<bool>,
    /// Inherited font size.
    pub font_size: Property<f64>,
    /// Width after the last arrange. Read-only.
    pub actual_width: Property<f64>,
    /// Height after the last arrange. Read-only.
    pub actual_height: Property<f64>,
    /// Background of panels, borders and controls.
    pub background: Property<Option<Brush>>,
    /// Grid row definitions.
    pub row_definitions: Property<Vec<TrackDefinition>>,
    /// Grid column definitions.
    pub column_definitions: Property<Vec<TrackDefinition>>,
    /// Attached: row of a grid child.
    pub row: Property<usize>,
    /// Attached: column of a grid child.
    pub column: Property<usize>,
    /// Attached: rows spanned by a grid child.
    pub row_span: Property<usize>,
    /// Attached: columns spanned by a grid child.
    pub column_span: Property<usize>,
    /// Stacking direction of a stack panel.
    pub orientation: Property<Orientation>,
    /// Border stroke paint.
    pub border_brush: Property<Option<Brush>>,
    /// Border stroke widths.
    pub border_thickness: Property<Insets>,
    /// Space between a border and its child.
    pub padding: Property<Insets>,
    /// Border corner radius.
    pub corner_radius: Property<f64>,
    /// Rectangle fill.
    pub fill: Property<Option<Brush>>,
    /// Rectangle stroke paint.
    pub stroke: Property<Option<Brush>>,
    /// Rectangle stroke width.
    pub stroke_thickness: Property<f64>,
    /// Control template.
    pub template: Property<Option<TemplateHandle>>,
    /// Content element of a control or presenter.
    pub content: Property<Option<ElementId>>,
}

/// Write capabilities the [`Ui`](crate::Ui) keeps for its read-only properties.
#[derive(Debug)]
pub(crate) struct Keys {
    pub(crate) actual_width: PropertyKey<f64>,
    pub(crate) actual_height: PropertyKey<f64>,
}

fn meta<T: PropertyValue>(default: T, flags: PropertyFlags) -> PropertyMetadata<T> {
    PropertyMetadataBuilder::new(default).flags(flags).build()
}

fn check<T: PropertyValue>(
    predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
) -> Option<Validator<T>> {
    Some(Arc::new(predicate))
}

fn non_negative(v: &f64) -> bool {
    *v >= 0.0
}

fn valid_insets(insets: &Insets) -> bool {
    [insets.x0, insets.y0, insets.x1, insets.y1]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
}

pub(crate) fn register(
    registry: &mut PropertyRegistry,
) -> Result<(Kinds, Props, Keys), PropertyError> {
    use PropertyFlags as F;

    let element = registry.register_kind("Element", None)?;
    let panel = registry.register_kind("Panel", Some(element))?;
    let control = registry.register_kind("Control", Some(element))?;
    let kinds = Kinds {
        element,
        panel,
        grid: registry.register_kind("Grid", Some(panel))?,
        stack_panel: registry.register_kind("StackPanel", Some(panel))?,
        border: registry.register_kind("Border", Some(element))?,
        rectangle: registry.register_kind("Rectangle", Some(element))?,
        content_presenter: registry.register_kind("ContentPresenter", Some(element))?,
        control,
        window: registry.register_kind("Window", Some(control))?,
    };

    let measure = F::AFFECTS_MEASURE;
    let arrange = F::AFFECTS_ARRANGE;
    let render = F::AFFECTS_RENDER;
    let length = |v: &Option<f64>| v.is_none_or(|v| v.is_finite() && v >= 0.0);
    let finite = |v: &f64| v.is_finite() && *v >= 0.0;

    let (actual_width, actual_width_key) =
        registry.register_read_only("ActualWidth", element, meta(0.0, F::empty()), None)?;
    let (actual_height, actual_height_key) =
        registry.register_read_only("ActualHeight", element, meta(0.0, F::empty()), None)?;

    let background = registry.register("Background", panel, meta(None, render), None)?;
    registry.add_owner(background, kinds.border, meta(None, render))?;
    registry.add_owner(background, control, meta(None, render))?;
    registry.override_metadata(
        background,
        kinds.window,
        meta(Some(Brush::Solid(Color::WHITE)), render),
    )?;

    let content = registry.register(
        "Content",
        kinds.content_presenter,
        meta(None, measure),
        None,
    )?;
    registry.add_owner(content, control, meta(None, measure))?;

    let font_size = registry.register(
        "FontSize",
        element,
        PropertyMetadataBuilder::new(12.0)
            .flags(measure)
            .inherits(true)
            .build(),
        check(|v: &f64| v.is_finite() && *v > 0.0),
    )?;

    let grid = kinds.grid;
    let border = kinds.border;
    let rectangle = kinds.rectangle;
    let span = |v: &usize| *v >= 1;
    let props = Props {
        width: registry.register("Width", element, meta(None, measure), check(length))?,
        height: registry.register("Height", element, meta(None, measure), check(length))?,
        min_width: registry.register("MinWidth", element, meta(0.0, measure), check(finite))?,
        max_width: registry.register(
            "MaxWidth",
            element,
            meta(f64::INFINITY, measure),
            check(non_negative),
        )?,
        min_height: registry.register("MinHeight", element, meta(0.0, measure), check(finite))?,
        max_height: registry.register(
            "MaxHeight",
            element,
            meta(f64::INFINITY, measure),
            check(non_negative),
        )?,
        margin: registry.register(
            "Margin",
            element,
            meta(Insets::ZERO, measure),
            check(valid_insets),
        )?,
        horizontal_alignment: registry.register(
            "HorizontalAlignment",
            element,
            meta(Alignment::Stretch, arrange),
            None,
        )?,
        vertical_alignment: registry.register(
            "VerticalAlignment",
            element,
            meta(Alignment::Stretch, arrange),
            None,
        )?,
        is_visible: registry.register("IsVisible", element, meta(true, measure | render), None)?,
        font_size,
        actual_width,
        actual_height,
        background,
        row_definitions: registry.register(
            "RowDefinitions",
            grid,
            meta(Vec::new(), measure),
            None,
        )?,
        column_definitions: registry.register(
            "ColumnDefinitions",
            grid,
            meta(Vec::new(), measure),
            None,
        )?,
        row: registry.register_attached("Row", grid, meta(0, measure), None)?,
        column: registry.register_attached("Column", grid, meta(0, measure), None)?,
        row_span: registry.register_attached("RowSpan", grid, meta(1, measure), check(span))?,
        column_span: registry.register_attached("ColumnSpan", grid, meta(1, measure), check(span))?,
        orientation: registry.register(
            "Orientation",
            kinds.stack_panel,
            meta(Orientation::Vertical, measure),
            None,
        )?,
        border_brush: registry.register("BorderBrush", border, meta(None, render), None)?,
        border_thickness: registry.register(
            "BorderThickness",
            border,
            meta(Insets::ZERO, measure | render),
            check(valid_insets),
        )?,
        padding: registry.register(
            "Padding",
            border,
            meta(Insets::ZERO, measure),
            check(valid_insets),
        )?,
        corner_radius: registry.register("CornerRadius", border, meta(0.0, render), check(finite))?,
        fill: registry.register("Fill", rectangle, meta(None, render), None)?,
        stroke: registry.register("Stroke", rectangle, meta(None, render), None)?,
        stroke_thickness: registry.register(
            "StrokeThickness",
            rectangle,
            meta(1.0, render),
            check(finite),
        )?,
        template: registry.register("Template", control, meta(None, measure), None)?,
        content,
    };

    let keys = Keys {
        actual_width: actual_width_key,
        actual_height: actual_height_key,
    };
    Ok((kinds, props, keys))
}
