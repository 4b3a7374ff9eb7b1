//! Static genre and country tables served to the front-end.
//!
//! Display names are Korean labels; values are the TMDB genre id or the
//! ISO 3166-1 country code. Both tables serialize as JSON objects whose
//! key order follows the table order.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// TMDB movie genres: display name → genre id.
pub const GENRES: &[(&str, u32)] = &[
    ("액션", 28),
    ("모험", 12),
    ("애니메이션", 16),
    ("코미디", 35),
    ("범죄", 80),
    ("다큐멘터리", 99),
    ("드라마", 18),
    ("가족", 10751),
    ("판타지", 14),
    ("역사", 36),
    ("공포", 27),
    ("음악", 10402),
    ("미스터리", 9648),
    ("로맨스", 10749),
    ("SF", 878),
    ("TV 영화", 10770),
    ("스릴러", 53),
    ("전쟁", 10752),
    ("서부", 37),
];

/// Selectable production countries: display name → ISO 3166-1 code.
pub const COUNTRIES: &[(&str, &str)] = &[
    ("한국", "KR"),
    ("미국", "US"),
    ("일본", "JP"),
    ("중국", "CN"),
    ("영국", "GB"),
    ("프랑스", "FR"),
    ("독일", "DE"),
    ("이탈리아", "IT"),
    ("스페인", "ES"),
    ("인도", "IN"),
    ("캐나다", "CA"),
    ("호주", "AU"),
    ("브라질", "BR"),
    ("멕시코", "MX"),
    ("러시아", "RU"),
];

/// An ordered name → value table that serializes as a JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Table<V: 'static>(pub &'static [(&'static str, V)]);

impl<V: Serialize> Serialize for Table<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The genre table.
#[must_use]
pub const fn genres() -> Table<u32> {
    Table(GENRES)
}

/// The country table.
#[must_use]
pub const fn countries() -> Table<&'static str> {
    Table(COUNTRIES)
}
