#![no_main]

use libfuzzer_sys::fuzz_target;

use domain::event::entity::EventCategory;
use domain::record::spool_record::SpoolRecord;

// Fuzz the spool file reader: arbitrary bytes against every category's
// text/binary boundary rule. Parsing may fail, but must never panic,
// and a successful parse must re-serialize and re-parse to the same
// record.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let category = EventCategory::ALL[data[0] as usize % EventCategory::ALL.len()];
    let bytes = &data[1..];

    if let Ok(record) = SpoolRecord::from_bytes(category, bytes) {
        if let Ok(reencoded) = record.to_bytes(category) {
            let reparsed =
                SpoolRecord::from_bytes(category, &reencoded).expect("re-encoded record parses");
            assert_eq!(reparsed, record);
        }
    }
});
