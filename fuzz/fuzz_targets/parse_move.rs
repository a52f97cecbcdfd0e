#![no_main]
use libfuzzer_sys::fuzz_target;
use oxo::game::core::Move;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(parsed) = Move::from_notation(s) {
            // Anything accepted is printed back in canonical form.
            assert_eq!(Move::from_notation(&Move::to_notation(parsed)), Ok(parsed));
        }
    }
});
