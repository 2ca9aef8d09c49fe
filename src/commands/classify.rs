use projspec_capture::classifier::classify;

pub fn run(text: &str) {
    match classify(text) {
        Some(found) => println!("{} {:.1}", found.kind, found.confidence),
        None => println!("no correction detected"),
    }
}
