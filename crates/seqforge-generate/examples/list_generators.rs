use seqforge_generate::generators::GeneratorRegistry;

fn main() {
    let registry = GeneratorRegistry::new();
    for kind in registry.kinds() {
        println!("{}", kind.keyword());
    }
}
