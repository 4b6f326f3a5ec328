#![no_main]

use libfuzzer_sys::fuzz_target;

use domain::record::codec;
use domain::record::fields::{AuditInfo, FieldKey};

// Fuzz the line codec: decode arbitrary lines, and check the round-trip
// law on maps built from fuzz bytes.
//
// Layout:
//   [0]  = selector (0=decode arbitrary, 1=round-trip constructed map)
//   rest = consumed in chunks per operation
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    match data[0] % 2 {
        // Sub-target 0: decode must never panic on foreign input.
        0 => {
            if let Ok(line) = std::str::from_utf8(&data[1..]) {
                let _ = codec::decode(line);
            }
        }

        // Sub-target 1: any encodable map must round-trip exactly.
        _ => {
            let mut info = AuditInfo::new();
            let mut cursor = 1;
            for key in FieldKey::ALL {
                if cursor >= data.len() {
                    break;
                }
                let len = (data[cursor] as usize % 16) + 1;
                cursor += 1;
                let end = (cursor + len).min(data.len());
                let value = String::from_utf8_lossy(&data[cursor..end]);
                cursor = end;
                info.set(key, value.into_owned());
            }
            match codec::encode(&info) {
                Ok(line) => {
                    let decoded = codec::decode(&line).expect("encoded line must decode");
                    assert_eq!(decoded, info);
                }
                // Values with line breaks are rejected by contract.
                Err(_) => {}
            }
        }
    }
});
