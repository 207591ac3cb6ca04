//! Fixed games and promo offers shown by the front-end.

use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Category {
    Slots,
    Roulette,
    Poker,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Slots, Category::Roulette, Category::Poker];

    pub fn next(self) -> Self {
        match self {
            Category::Slots => Category::Roulette,
            Category::Roulette => Category::Poker,
            Category::Poker => Category::Slots,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Category::Slots => Category::Poker,
            Category::Roulette => Category::Slots,
            Category::Poker => Category::Roulette,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Category::Slots => 0,
            Category::Roulette => 1,
            Category::Poker => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Slots => "Slots",
            Category::Roulette => "Roulette",
            Category::Poker => "Poker",
        };
        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Metric {
    Jackpot(&'static str),
    Table(&'static str),
    Players(u32),
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Jackpot(j) => write!(f, "Jackpot {j}"),
            Metric::Table(t) => write!(f, "{t}"),
            Metric::Players(n) => write!(f, "{n} playing"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Game {
    pub id: u32,
    pub name: &'static str,
    pub provider: &'static str,
    pub category: Category,
    pub metric: Metric,
    pub trending: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Promo {
    pub title: &'static str,
    pub description: &'static str,
    pub code: &'static str,
}

const fn game(
    id: u32,
    name: &'static str,
    provider: &'static str,
    category: Category,
    metric: Metric,
    trending: bool,
) -> Game {
    Game {
        id,
        name,
        provider,
        category,
        metric,
        trending,
    }
}

pub static GAMES: [Game; 12] = [
    game(1, "Lucky 7", "NetEnt", Category::Slots, Metric::Jackpot("2.5M ₽"), true),
    game(2, "Fruit Party", "Pragmatic", Category::Slots, Metric::Jackpot("890K ₽"), true),
    game(3, "Gates of Olympus", "Pragmatic", Category::Slots, Metric::Jackpot("1.2M ₽"), false),
    game(4, "Sweet Bonanza", "Pragmatic", Category::Slots, Metric::Jackpot("750K ₽"), true),
    game(5, "Book of Dead", "Play'n GO", Category::Slots, Metric::Jackpot("450K ₽"), false),
    game(6, "Starlight Princess", "Pragmatic", Category::Slots, Metric::Jackpot("1.8M ₽"), true),
    game(7, "European Roulette", "Evolution", Category::Roulette, Metric::Table("Live"), true),
    game(8, "Lightning Roulette", "Evolution", Category::Roulette, Metric::Table("Live"), true),
    game(9, "Russian Roulette", "Evolution", Category::Roulette, Metric::Table("Live"), false),
    game(10, "Texas Hold'em", "PokerStars", Category::Poker, Metric::Players(234), true),
    game(11, "Omaha Poker", "PokerStars", Category::Poker, Metric::Players(89), false),
    game(12, "Casino Hold'em", "Evolution", Category::Poker, Metric::Players(156), true),
];

pub static PROMOS: [Promo; 3] = [
    Promo {
        title: "Welcome bonus",
        description: "100% on the first deposit up to 50 000 ₽",
        code: "WELCOME100",
    },
    Promo {
        title: "10% cashback",
        description: "Weekly refund of losses",
        code: "CASHBACK10",
    },
    Promo {
        title: "Free spins",
        description: "50 free spins",
        code: "FREE50",
    },
];

pub fn games_in(category: Category) -> Vec<&'static Game> {
    GAMES.iter().filter(|g| g.category == category).collect()
}

pub fn trending() -> Vec<&'static Game> {
    GAMES.iter().filter(|g| g.trending).collect()
}

pub fn find_game(id: u32) -> Option<&'static Game> {
    GAMES.iter().find(|g| g.id == id)
}

pub fn find_promo(code: &str) -> Option<&'static Promo> {
    PROMOS.iter().find(|p| p.code.eq_ignore_ascii_case(code))
}
