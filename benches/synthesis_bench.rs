use criterion::{criterion_group, criterion_main, Bencher, Criterion};

use deckforge::domain::card::Card;
use deckforge::domain::functions::generate::{build_deck, DeckOptions};
use deckforge::domain::stats::DeckStats;

const COLOURS: [&str; 3] = ["G", "U", "R"];

fn card(index: usize, type_line: &str, oracle_text: &str) -> Card {
    let colour = COLOURS[index % COLOURS.len()];
    Card {
        id: format!("{index:05}"),
        name: format!("Card {index}"),
        type_line: type_line.to_string(),
        mana_cost: format!("{{{}}}{{{colour}}}", index % 5),
        cmc: (index % 5 + 1) as f64,
        oracle_text: oracle_text.to_string(),
        color_identity: vec![colour.to_string()],
        ..Card::default()
    }
}

fn pool() -> (Card, Vec<(Card, u8)>, Vec<Card>) {
    let commander = Card {
        id: String::from("commander"),
        name: String::from("Tatyova, Benthic Druid"),
        type_line: String::from("Legendary Creature — Merfolk Druid"),
        mana_cost: String::from("{3}{G}{U}"),
        color_identity: vec![String::from("G"), String::from("U")],
        ..Card::default()
    };

    let recommendations = (0..300)
        .map(|index| {
            let type_line = if index % 7 == 0 { "Land" } else { "Creature — Elf" };
            (card(index, type_line, "When this enters, scry 1."), (index % 100) as u8)
        })
        .collect();

    let texts = [
        "{T}: Add {G}.",
        "Destroy all creatures.",
        "Draw two cards.",
        "Destroy target artifact.",
        "Counter target spell.",
    ];
    let staples = (300..500)
        .map(|index| card(index, "Sorcery", texts[index % texts.len()]))
        .collect();

    (commander, recommendations, staples)
}

fn bench(c: &mut Criterion) {
    let (commander, recommendations, staples) = pool();
    let options = DeckOptions::default();

    c.bench_function("Build deck", |b: &mut Bencher| {
        b.iter(|| build_deck(&commander, &recommendations, &staples, &options))
    });

    let (deck, open_land_slots) = build_deck(&commander, &recommendations, &staples, &options)
        .expect("commander is legendary");

    c.bench_function("Basic land split", |b: &mut Bencher| {
        b.iter(|| deck.basic_land_split(open_land_slots))
    });

    c.bench_function("Deck stats", |b: &mut Bencher| b.iter(|| DeckStats::from(&deck)));
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(50);
    targets = bench
}

criterion_main!(benches);
