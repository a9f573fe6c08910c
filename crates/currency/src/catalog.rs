//! The builtin currency catalog.
//!
//! Five currencies ship with the simulation. The per-rung `minor_ratio`
//! values are load-bearing: every conversion and every major-unit snapshot
//! figure derives from them, so they are asserted explicitly in tests.

use crate::currency::Currency;
use crate::unit::{CurrencyUnit, UnitKind};

/// The currencies every bank supports, in catalog order.
pub(crate) fn currencies() -> Vec<Currency> {
    vec![cad(), usd(), gbp(), eur(), jpy()]
}

/// Millions/billions/trillions rungs are the same for every catalog currency.
fn volume_units() -> [CurrencyUnit; 3] {
    [
        CurrencyUnit::new(UnitKind::Millions, "million", "millions", "M", 100_000_000),
        CurrencyUnit::new(UnitKind::Billions, "billion", "billions", "B", 100_000_000_000),
        CurrencyUnit::new(
            UnitKind::Trillions,
            "trillion",
            "trillions",
            "Tr",
            100_000_000_000_000,
        ),
    ]
}

fn ladder(micro: CurrencyUnit, minor: CurrencyUnit, major: CurrencyUnit) -> [CurrencyUnit; 6] {
    let [millions, billions, trillions] = volume_units();
    [micro, minor, major, millions, billions, trillions]
}

fn cad() -> Currency {
    Currency::from_ladder(
        "canadian dollars",
        "CAD",
        ladder(
            CurrencyUnit::new(
                UnitKind::Micro,
                "hundredth of a cent",
                "hundredths of a cent",
                "µ",
                100,
            ),
            CurrencyUnit::new(UnitKind::Minor, "penny", "pennies", "¢", 1),
            CurrencyUnit::new(UnitKind::Major, "dollar", "dollars", "$", 100),
        ),
    )
}

fn usd() -> Currency {
    Currency::from_ladder(
        "american dollars",
        "USD",
        ladder(
            CurrencyUnit::new(
                UnitKind::Micro,
                "hundredth of a cent",
                "hundredths of a cent",
                "µ",
                100,
            ),
            CurrencyUnit::new(UnitKind::Minor, "penny", "pennies", "¢", 1),
            CurrencyUnit::new(UnitKind::Major, "dollar", "dollars", "$", 100),
        ),
    )
}

fn gbp() -> Currency {
    Currency::from_ladder(
        "british pound sterling",
        "GBP",
        ladder(
            CurrencyUnit::new(
                UnitKind::Micro,
                "hundredth of a penny",
                "hundredths of a penny",
                "µ",
                100,
            ),
            CurrencyUnit::new(UnitKind::Minor, "penny", "pence", "p", 1),
            CurrencyUnit::new(UnitKind::Major, "pound", "pounds", "£", 100),
        ),
    )
}

fn eur() -> Currency {
    Currency::from_ladder(
        "euro",
        "EUR",
        ladder(
            CurrencyUnit::new(
                UnitKind::Micro,
                "hundredth of a euro cent",
                "hundredths of a euro cent",
                "µ",
                100,
            ),
            CurrencyUnit::new(UnitKind::Minor, "euro cent", "euro cents", "c", 1),
            CurrencyUnit::new(UnitKind::Major, "euro", "euros", "€", 100),
        ),
    )
}

// JPY has no everyday sub-unit: the yen itself is the minor unit (ratio 1),
// micro is a tenth of a yen, and the "major" rung is a thousand yen.
fn jpy() -> Currency {
    Currency::from_ladder(
        "japanese yen",
        "JPY",
        ladder(
            CurrencyUnit::new(UnitKind::Micro, "tenth of a yen", "tenths of a yen", "µ", 10),
            CurrencyUnit::new(UnitKind::Minor, "yen", "yen", "¥", 1),
            CurrencyUnit::new(
                UnitKind::Major,
                "thousand yen",
                "thousand yen",
                "¥K",
                100_000,
            ),
        ),
    )
}
