//! Dev tool: feed one channel a repeated message through the real engine and
//! watch the escalation play out.

use {
    reprise_config::RepriseConfig,
    reprise_repeater::{Action, RepeatEngine},
};

pub fn run(config: &RepriseConfig, channel: &str, message: &str, count: u32) {
    let factor = config.repeater.effective_factor();
    let mut engine = RepeatEngine::new(factor);

    println!("feeding {count} x {message:?} into channel {channel:?} (a = {factor})");

    let mut echoed_at = None;
    for n in 1..=count {
        match engine.observe(channel, message) {
            Action::Echo(_) => {
                echoed_at = Some(n);
                println!("message {n:>3}: ECHO");
            },
            Action::Silent => {
                let probability = engine.channel(channel).map_or(0.0, |s| s.probability());
                println!("message {n:>3}: silent (p -> {probability:.9})");
            },
        }
    }

    match echoed_at {
        Some(n) => println!("echoed after {n} messages"),
        None => {
            // Survival across k failed trials is a^(-k(k-1)/2): trial j runs
            // against p = 1 - a^-(j-1).
            let k = f64::from(count.saturating_sub(1));
            let survival = factor.get().powf(-k * (k - 1.0) / 2.0);
            println!(
                "no echo after {count} messages (a run this quiet had probability {:.2}%)",
                survival * 100.0
            );
        },
    }
}
