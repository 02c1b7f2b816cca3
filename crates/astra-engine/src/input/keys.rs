//! Key codes, following the browser keyCode convention games were
//! written against.

pub type KeyCode = u32;

/// Wildcard: listeners on this code receive every key press.
pub const ANY_KEY: KeyCode = u32::MAX;

pub const BACKSPACE: KeyCode = 8;
pub const TAB: KeyCode = 9;
pub const ENTER: KeyCode = 13;
pub const SHIFT: KeyCode = 16;
pub const CTRL: KeyCode = 17;
pub const ESC: KeyCode = 27;
pub const SPACEBAR: KeyCode = 32;
pub const LEFT: KeyCode = 37;
pub const UP: KeyCode = 38;
pub const RIGHT: KeyCode = 39;
pub const DOWN: KeyCode = 40;

pub const KEY_0: KeyCode = 48;
pub const KEY_1: KeyCode = 49;
pub const KEY_2: KeyCode = 50;
pub const KEY_3: KeyCode = 51;
pub const KEY_4: KeyCode = 52;
pub const KEY_5: KeyCode = 53;
pub const KEY_6: KeyCode = 54;
pub const KEY_7: KeyCode = 55;
pub const KEY_8: KeyCode = 56;
pub const KEY_9: KeyCode = 57;

pub const A: KeyCode = 65;
pub const B: KeyCode = 66;
pub const C: KeyCode = 67;
pub const D: KeyCode = 68;
pub const E: KeyCode = 69;
pub const F: KeyCode = 70;
pub const G: KeyCode = 71;
pub const H: KeyCode = 72;
pub const I: KeyCode = 73;
pub const J: KeyCode = 74;
pub const K: KeyCode = 75;
pub const L: KeyCode = 76;
pub const M: KeyCode = 77;
pub const N: KeyCode = 78;
pub const O: KeyCode = 79;
pub const P: KeyCode = 80;
pub const Q: KeyCode = 81;
pub const R: KeyCode = 82;
pub const S: KeyCode = 83;
pub const T: KeyCode = 84;
pub const U: KeyCode = 85;
pub const V: KeyCode = 86;
pub const W: KeyCode = 87;
pub const X: KeyCode = 88;
pub const Y: KeyCode = 89;
pub const Z: KeyCode = 90;
