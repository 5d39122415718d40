// ============================================================================
// Basic Usage Example
// ============================================================================

use replay_matcher::prelude::*;

fn main() {
    println!("=== Replay Matcher Example ===\n");

    // Drive the engine event by event.
    let mut engine = Engine::new();
    let mut transcript = Transcript::new();

    println!("Adding sell orders...");
    for i in 0i64..5 {
        engine.apply(
            Event::Add {
                client_id: 1,
                book_id: 1,
                order_token: i,
                side: Side::Sell,
                quantity: 10,
                price: 100 + i,
            },
            &mut transcript,
        );
    }

    println!("Adding a crossing buy order...");
    engine.apply(
        Event::Add {
            client_id: 2,
            book_id: 1,
            order_token: 100,
            side: Side::Buy,
            quantity: 25,
            price: 103,
        },
        &mut transcript,
    );

    println!("Cancelling a resting sell...");
    engine.apply(
        Event::Cancel {
            client_id: 1,
            order_token: 4,
        },
        &mut transcript,
    );

    engine.finish(&mut transcript);

    println!("\n=== Transcript ===");
    print!("{transcript}");

    // The same run, straight from an event log.
    let input = "\
O, Client 1, OrderBook 1, Token 1, B, 100, 10
O, Client 2, OrderBook 1, Token 2, S, 50, 9
X, Client 1, Token 1
";
    println!("=== Replayed from event log ===");
    match replay_matcher::replay::run(input) {
        Ok(output) => print!("{output}"),
        Err(err) => eprintln!("replay failed: {err}"),
    }
}
