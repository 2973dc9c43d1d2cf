use rust_types::NonCopyable;

fn main() {
    let a = NonCopyable::default();
    let _b = a;
    let _c = a;
}
