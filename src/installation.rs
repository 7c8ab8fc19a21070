//! Wiring preset for the 22-strip installation
//!
//! Six outputs carry 3, 4, 4, 3, 4 and 4 strips of 122 LEDs, chained in
//! strip id order.

use crate::topology::{StripConfig, TopologyConfig};

/// Strips chained on each output
pub const OUTPUT_STRIPS: [u8; 6] = [3, 4, 4, 3, 4, 4];
/// LEDs per strip
pub const STRIP_LEN: u16 = 122;
/// Number of strips
pub const STRIP_COUNT: usize = 22;
/// LEDs on all outputs together
pub const TOTAL_LEDS: usize = STRIP_COUNT * STRIP_LEN as usize;

/// LED count of each output
pub const OUTPUT_LEDS: [u16; 6] = {
    let mut leds = [0; 6];
    let mut output = 0;
    while output < OUTPUT_STRIPS.len() {
        leds[output] = OUTPUT_STRIPS[output] as u16 * STRIP_LEN;
        output += 1;
    }
    leds
};

const _: () = {
    let mut strips = 0;
    let mut output = 0;
    while output < OUTPUT_STRIPS.len() {
        strips += OUTPUT_STRIPS[output] as usize;
        output += 1;
    }
    assert!(strips == STRIP_COUNT);
};

/// Strip placements, indexed by strip id
pub const fn strips() -> [StripConfig; STRIP_COUNT] {
    let mut strips = [StripConfig {
        output: 0,
        offset: 0,
        len: STRIP_LEN,
        reversed: false,
    }; STRIP_COUNT];

    let mut id = 0;
    let mut output = 0;
    while output < OUTPUT_STRIPS.len() {
        let mut position = 0;
        while position < OUTPUT_STRIPS[output] {
            strips[id].output = output as u8;
            strips[id].offset = position as u16 * STRIP_LEN;
            id += 1;
            position += 1;
        }
        output += 1;
    }
    strips
}

/// Strip placements as a constant
pub const STRIPS: [StripConfig; STRIP_COUNT] = strips();

/// Topology of the installation
pub const TOPOLOGY: TopologyConfig<'static> = TopologyConfig {
    outputs: &OUTPUT_LEDS,
    strips: &STRIPS,
};
