use brewery::auto_init;
use core::marker::PhantomData;

#[auto_init]
#[derive(Debug, PartialEq)]
pub struct Cat {
    pub age: u32,
    pub name: Option<String>,
    pub soft: bool,
    #[default(true)]
    pub fuzzy: bool,
}

#[auto_init(access = "internal")]
pub struct Tagged<T> {
    pub id: u64,
    #[default(Vec::new())]
    pub labels: Vec<String>,
    _tag: PhantomData<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memberwise() {
        let cat = Cat::new(3, true);
        assert_eq!(
            cat,
            Cat {
                age: 3,
                name: None,
                soft: true,
                fuzzy: true,
            }
        );
    }

    #[test]
    fn defaults_can_be_overridden() {
        let cat = Cat::new(3, true).with_name(Some("Leo".to_string())).with_fuzzy(false);
        assert_eq!(cat.name.as_deref(), Some("Leo"));
        assert!(!cat.fuzzy);
        assert_eq!(cat.age, 3);
    }

    #[test]
    fn generic_with_phantom() {
        let tagged = Tagged::<String>::new(9);
        assert_eq!(tagged.id, 9);
        assert!(tagged.labels.is_empty());
        let tagged = tagged.with_labels(vec!["new".to_string()]);
        assert_eq!(tagged.labels, ["new"]);
    }
}
