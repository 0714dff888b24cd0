//! Property tests for identifier derivation from stored rows

use proptest::prelude::*;
use qms_core::next_in_period;
use qms_records::{Period, RecordId, RecordType, RowMap, COL_ID};

fn record_type() -> impl Strategy<Value = RecordType> {
    prop_oneof![
        Just(RecordType::Complaint),
        Just(RecordType::Deviation),
        Just(RecordType::ChangeControl),
    ]
}

fn period() -> impl Strategy<Value = Period> {
    (1u32..=12, 0u32..=99).prop_map(|(m, y)| Period::new(m, y).unwrap())
}

fn id_rows(ids: &[RecordId]) -> Vec<RowMap> {
    ids.iter()
        .map(|id| RowMap::from_iter([(COL_ID.to_string(), id.to_string())]))
        .collect()
}

proptest! {
    #[test]
    fn sequential_generation_yields_one_to_n(rt in record_type(), p in period(), n in 1usize..40) {
        let mut stored = Vec::new();
        for expected in 1..=n {
            let id = next_in_period(rt, p, &id_rows(&stored)).unwrap();
            prop_assert_eq!(id.serial() as usize, expected);
            prop_assert!(id.is_in(rt, p));
            stored.push(id);
        }
    }

    #[test]
    fn next_exceeds_every_stored_serial(
        rt in record_type(),
        p in period(),
        serials in prop::collection::vec(1u32..5000, 0..20),
    ) {
        let ids: Vec<_> = serials
            .iter()
            .map(|s| RecordId::new(rt, p, *s).unwrap())
            .collect();
        let next = next_in_period(rt, p, &id_rows(&ids)).unwrap();
        let max = serials.iter().copied().max().unwrap_or(0);
        prop_assert_eq!(next.serial(), max + 1);
    }

    #[test]
    fn other_periods_never_influence(
        rt in record_type(),
        p in period(),
        other in period(),
        serial in 1u32..1000,
    ) {
        prop_assume!(p != other);
        let stored = [RecordId::new(rt, other, serial).unwrap()];
        prop_assert_eq!(next_in_period(rt, p, &id_rows(&stored)).unwrap().serial(), 1);
    }

    #[test]
    fn garbage_cells_never_panic(cells in prop::collection::vec(".{0,16}", 0..10)) {
        let rows: Vec<RowMap> = cells
            .into_iter()
            .map(|c| RowMap::from_iter([(COL_ID.to_string(), c)]))
            .collect();
        let p = Period::new(1, 26).unwrap();
        let id = next_in_period(RecordType::Complaint, p, &rows).unwrap();
        prop_assert!(id.serial() >= 1);
    }
}
