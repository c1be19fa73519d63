#![no_main]

use libfuzzer_sys::fuzz_target;
use unique_ipv4_counter::ipv4;

fuzz_target!(|data: &[u8]| {
    if let Ok(key) = ipv4::parse_bytes(data) {
        // every accepted line must name the same address as its canonical form
        let canonical = ipv4::to_addr(key).to_string();
        assert_eq!(ipv4::parse(&canonical), Ok(key));
        assert_eq!(u32::from_be_bytes(ipv4::octets(key)), key);
    }
});
