use std::sync::Arc;

use braid_di::{downcast_value, ComponentClass, DiBuilder, FieldMeta, SiteMeta, Singleton};

#[derive(Debug)]
struct Greeter {
    prefix: Arc<String>,
    audit: Option<Arc<Audit>>,
}

#[derive(Debug)]
struct Audit {
    label: &'static str,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let audit_class = ComponentClass::of::<Audit>()
        .annotated(Singleton)
        .default_constructor(|| Box::new(Audit { label: "shared" }))
        .build();

    let greeter_class = ComponentClass::of::<Greeter>()
        .inject_constructor(vec![SiteMeta::of::<String>()], |mut args| {
            Box::new(Greeter {
                prefix: args.take::<String>(),
                audit: None,
            })
        })
        .field(FieldMeta::inject(
            "audit",
            SiteMeta::of::<Audit>(),
            |target, value| {
                target.downcast_mut::<Greeter>().expect("greeter instance").audit =
                    Some(downcast_value::<Audit>(value));
            },
        ))
        .build();

    let container = DiBuilder::new()
        .add_instance("hello".to_string())
        .add_component::<Audit>(&audit_class)?
        .add_component::<Greeter>(&greeter_class)?
        .build()?;

    println!("{:?}", container);

    let greeter = container.resolve::<Greeter>().expect("greeter is bound");
    let audit = greeter.audit.as_ref().expect("audit injected");
    println!("{} from {}", greeter.prefix, audit.label);

    let again = container.resolve::<Greeter>().expect("greeter is bound");
    println!(
        "audit shared between lookups: {}",
        Arc::ptr_eq(audit, again.audit.as_ref().expect("audit injected"))
    );

    Ok(())
}
