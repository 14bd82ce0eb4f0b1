//! Integration tests for gift storage and summaries.

use chrono::NaiveDate;
use gifttracker_core::{Cost, GiftDb, GiftFilter, NewGift};
use proptest::prelude::*;

fn arb_gift() -> impl Strategy<Value = NewGift> {
    (
        "[A-Za-z][A-Za-z ]{0,15}",
        "[A-Za-z0-9][A-Za-z0-9 ,.]{0,30}",
        (2000i32..2030, 1u32..=12, 1u32..=28),
        prop::option::of(0i64..1_000_000),
        prop::option::of(prop::sample::select(vec!["Books", "Toys", "Food", "books"])),
    )
        .prop_map(|(giver, details, (y, m, d), cents, category)| {
            let mut gift = NewGift::new(giver, details, NaiveDate::from_ymd_opt(y, m, d).unwrap());
            gift.cost = cents.map(|c| Cost::from_cents(c).unwrap());
            gift.category = category.map(str::to_string);
            gift
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn added_gift_listed_exactly_once(existing in prop::collection::vec(arb_gift(), 0..8), gift in arb_gift()) {
        let db = GiftDb::open_memory().unwrap();
        for g in existing {
            db.add_gift(g).unwrap();
        }
        let id = db.add_gift(gift.clone()).unwrap();

        let all = db.list_all().unwrap();
        let matches: Vec<_> = all.iter().filter(|g| g.id == id).collect();
        prop_assert_eq!(matches.len(), 1);
        prop_assert_eq!(&matches[0].giver, gift.giver.trim());
        prop_assert_eq!(matches[0].date_received, gift.date_received);
        prop_assert_eq!(matches[0].cost, gift.cost);
    }

    #[test]
    fn category_filter_returns_only_that_category(
        gifts in prop::collection::vec(arb_gift(), 0..12),
        wanted in prop::sample::select(vec!["Books", "Toys", "Food", "books", "Garden"]),
    ) {
        let db = GiftDb::open_memory().unwrap();
        let expected = gifts
            .iter()
            .filter(|g| g.category.as_deref() == Some(wanted))
            .count();
        for g in gifts {
            db.add_gift(g).unwrap();
        }

        let filtered = db.list_filtered(&GiftFilter::category(wanted)).unwrap();
        prop_assert_eq!(filtered.len(), expected);
        prop_assert!(filtered.iter().all(|g| g.category.as_deref() == Some(wanted)));
        prop_assert!(filtered.windows(2).all(|w| w[0].date_received >= w[1].date_received));
    }
}

#[test]
fn test_thank_you_flag_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gifts.db");
    let timeout = std::time::Duration::from_millis(500);

    let id = {
        let db = GiftDb::open_at(&path, timeout).unwrap();
        let id = db
            .add_gift(NewGift::new("Dana", "Candle", NaiveDate::from_ymd_opt(2024, 12, 24).unwrap()))
            .unwrap();
        assert!(db.mark_thank_you_sent(id));
        assert!(db.mark_thank_you_sent(id));
        id
    };

    let db = GiftDb::open_at(&path, timeout).unwrap();
    assert!(db.get_gift(id).unwrap().unwrap().thank_you_sent);
    assert_eq!(db.summary(&GiftFilter::default()).unwrap().thank_you_pending, 0);
}

#[test]
fn test_inverted_date_range_is_rejected() {
    let db = GiftDb::open_memory().unwrap();
    let filter = GiftFilter::between(
        NaiveDate::from_ymd_opt(2024, 2, 1),
        NaiveDate::from_ymd_opt(2024, 1, 1),
    );
    assert!(db.list_filtered(&filter).is_err());
}
