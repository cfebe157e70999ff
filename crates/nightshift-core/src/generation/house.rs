//! Default house - the six rooms covered by the night-shift cameras.
//!
//! Only what the anomaly engine can touch is modelled: named props with
//! room-local centers, the ceiling light, and the living room's painting and
//! TV screen. Geometry, textures and framing belong to the presentation.

use crate::catalogue::{CatalogueError, RoomCatalogue, RoomSpec};
use crate::components::{Color, Screen};

const STANDARD_LIGHT: f32 = 15.0;
const HALLWAY_LIGHT: f32 = 25.0;

/// Room specs for the default house, in camera order.
pub fn default_house_specs() -> Vec<RoomSpec> {
    vec![
        living_room(),
        kitchen(),
        bedroom(),
        hallway(),
        office(),
        bathroom(),
    ]
}

impl RoomCatalogue {
    pub fn default_house() -> Result<Self, CatalogueError> {
        Self::from_specs(default_house_specs())
    }
}

fn living_room() -> RoomSpec {
    let back = -6.0;
    RoomSpec::new("living-room", "Living Room")
        .with_dimensions(12.0, 6.0, 12.0)
        .with_light(STANDARD_LIGHT, 0xffffff)
        .with_painting(0x1a3a6b)
        .with_screen(Screen::off(Color::from_hex(0x050505)))
        .with_prop("rug", 0.0, 0.04, 0.0)
        .with_prop("sofa seat", 0.0, 0.5, -2.5)
        .with_prop("sofa back", 0.0, 1.0, -3.4)
        .with_prop("sofa arm (right)", 2.95, 0.5, -2.5)
        .with_prop("sofa arm (left)", -2.95, 0.5, -2.5)
        .with_prop("coffee table", 0.0, 0.86, 1.0)
        .with_prop("side cabinet", -4.3, 0.9, -2.5)
        .with_prop("plant pot", -4.3, 2.075, -2.0)
        .with_prop("tv stand", 0.0, 0.45, 4.0)
        .with_prop("tv body", 0.0, 1.9, 4.0)
        .with_prop("painting frame", 3.5, 3.8, back + 0.08)
}

fn kitchen() -> RoomSpec {
    let back = -5.0;
    let counter_top = 1.5 + 0.12;
    RoomSpec::new("kitchen", "Kitchen")
        .with_dimensions(10.0, 6.0, 10.0)
        .with_light(STANDARD_LIGHT, 0xffffee)
        .with_prop("rug", 0.0, 0.04, 0.0)
        .with_prop("left cabinets", -2.525, 0.75, back + 0.75)
        .with_prop("right cabinets", 2.525, 0.75, back + 0.75)
        .with_prop("stove", 0.0, 0.75, back + 0.75)
        .with_prop("countertop", 0.0, counter_top - 0.06, back + 0.825)
        .with_prop("vent hood", 0.0, counter_top + 3.0, back + 0.75)
        .with_prop("kettle", -2.5, counter_top + 0.3, back + 0.9)
        .with_prop("sink", 3.0, counter_top + 0.04, back + 0.8)
        .with_prop("plant pot", 4.5, 0.275, 1.5)
}

fn bedroom() -> RoomSpec {
    let back = -6.0;
    RoomSpec::new("bedroom", "Bedroom")
        .with_dimensions(10.0, 6.0, 12.0)
        .with_light(STANDARD_LIGHT, 0x88bbff)
        .with_prop("rug", 0.0, 0.04, 0.0)
        .with_prop("headboard", 0.0, 1.8, back + 0.1)
        .with_prop("mattress", 0.0, 0.45, back + 3.1)
        .with_prop("pillow (left)", -1.1, 1.0, back + 0.8)
        .with_prop("pillow (right)", 1.1, 1.0, back + 0.8)
        .with_prop("nightstand (left)", -3.2, 0.45, back + 0.95)
        .with_prop("nightstand (right)", 3.2, 0.45, back + 0.95)
        .with_prop("plant pot", 3.2, 0.275, 4.0)
}

fn hallway() -> RoomSpec {
    RoomSpec::new("hallway", "Hallway")
        .with_dimensions(6.0, 6.0, 20.0)
        .with_light(HALLWAY_LIGHT, 0xfff5e0)
        .with_prop("door", -2.85, 1.5, 0.0)
}

fn office() -> RoomSpec {
    let desk_height = 1.4;
    RoomSpec::new("office", "Office")
        .with_dimensions(8.0, 6.0, 8.0)
        .with_light(STANDARD_LIGHT, 0xffeeaa)
        .with_prop("rug", 0.0, 0.04, 0.0)
        .with_prop("desk", 0.0, desk_height + 0.05, -1.8)
        .with_prop("monitor base", 0.0, desk_height + 0.14, -2.4)
        .with_prop("monitor", 0.0, desk_height + 1.58, -2.4)
        .with_prop("chair seat", 0.0, 0.9, 0.0)
        .with_prop("chair back", 0.0, 1.8, 0.65)
        .with_prop("plant pot (left)", -3.5, 0.275, 0.0)
        .with_prop("plant pot (right)", 3.5, 0.275, -2.5)
}

fn bathroom() -> RoomSpec {
    let back = -3.0;
    RoomSpec::new("bathroom", "Bathroom")
        .with_dimensions(6.0, 6.0, 6.0)
        .with_light(STANDARD_LIGHT, 0xccffff)
        .with_prop("bath mat", 0.5, 0.04, 0.0)
        .with_prop("vanity", 1.2, 0.9, back + 0.75)
        .with_prop("vanity top", 1.2, 1.55, back + 0.75)
        .with_prop("toilet", -2.0, 0.5, back + 1.5)
        .with_prop("toilet seat", -2.0, 1.07, back + 1.5)
        .with_prop("cistern", -2.0, 0.9, back + 0.35)
        .with_prop("plant pot", -2.0, 1.275, back + 0.6)
}
