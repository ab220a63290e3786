use brewery::auto_type_erase;

#[auto_type_erase]
trait Animal {
    #[property]
    fn name(&self) -> String;
    #[property]
    fn legs(&self) -> u8;
    fn speak(&self, times: usize) -> String;
    fn greet(&self, other: &str) -> String;
    async fn sleep(&self, hours: u32) -> u32;
}

struct Cat;

impl Animal for Cat {
    fn name(&self) -> String {
        "Tom".to_string()
    }

    fn legs(&self) -> u8 {
        4
    }

    fn speak(&self, times: usize) -> String {
        vec!["meow"; times].join(" ")
    }

    fn greet(&self, other: &str) -> String {
        format!("hiss, {}", other)
    }

    async fn sleep(&self, hours: u32) -> u32 {
        hours * 2
    }
}

struct Bird {
    song: String,
}

impl Animal for Bird {
    fn name(&self) -> String {
        "Tweety".to_string()
    }

    fn legs(&self) -> u8 {
        2
    }

    fn speak(&self, times: usize) -> String {
        vec![self.song.as_str(); times].join(" ")
    }

    fn greet(&self, other: &str) -> String {
        format!("{} to {}", self.song, other)
    }

    async fn sleep(&self, hours: u32) -> u32 {
        hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoo() -> Vec<AnyAnimal> {
        vec![
            AnyAnimal::new(Cat),
            AnyAnimal::new(Bird {
                song: "tweet".to_string(),
            }),
        ]
    }

    #[test]
    fn properties_are_copied() {
        let names = zoo().iter().map(|animal| (animal.name(), animal.legs())).collect::<Vec<_>>();
        assert_eq!(names, [("Tom".to_string(), 4), ("Tweety".to_string(), 2)]);
    }

    #[test]
    fn methods_are_forwarded() {
        let zoo = zoo();
        assert_eq!(zoo[0].speak(2), "meow meow");
        assert_eq!(zoo[1].speak(3), "tweet tweet tweet");
        assert_eq!(zoo[0].greet("Rex"), "hiss, Rex");
        assert_eq!(zoo[1].greet("Rex"), "tweet to Rex");
    }

    #[test]
    fn clones_share_the_value() {
        let bird = AnyAnimal::new(Bird {
            song: "chirp".to_string(),
        });
        let copy = bird.clone();
        drop(bird);
        assert_eq!(copy.speak(1), "chirp");
        assert_eq!(copy.name(), "Tweety");
    }

    #[tokio::test]
    async fn async_methods_are_awaited() {
        let zoo = zoo();
        assert_eq!(zoo[0].sleep(3).await, 6);
        assert_eq!(zoo[1].sleep(3).await, 3);
    }
}
