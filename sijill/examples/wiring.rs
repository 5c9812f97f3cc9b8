//! Wires two toy services together and prints what they hold.
//!
//! Run with `RUST_LOG=sijill_container=trace` to watch resolution.

use std::sync::Arc;

use sijill::logging::init_tracing;
use sijill::prelude::*;
use tracing::info;

struct Foo {
    foo_message: String,
}

struct Bar {
    bar_message: String,
    foo: Arc<Foo>,
}

fn main() -> Result<()> {
    init_tracing("sijill_container=debug");

    let registry = Registry::with_services(
        ServiceMap::new()
            .with(
                "Foo",
                Factory::new(|_| Ok(Foo { foo_message: "fooMessage".to_string() })),
            )
            .with(
                "Bar",
                Factory::new(|lookup| {
                    Ok(Bar {
                        bar_message: "barMessage".to_string(),
                        foo: lookup.lookup_as("Foo")?,
                    })
                }),
            ),
    );
    info!(?registry, "Registry ready");

    let bar: Arc<Bar> = registry.get_as("Bar")?;
    println!("{}", bar.bar_message);
    println!("{}", bar.foo.foo_message);

    Ok(())
}
