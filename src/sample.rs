/// Document shown on first launch and after a reset.
pub const DEFAULT_TEXT: &str = r#"# Welcome to splitmark!

## This is a sub-heading...
### And here's some other cool stuff:

Here's some code, `<div></div>`, between 2 backticks.

```
// this is multi-line code:

fn another_example(first_line: &str, last_line: &str) -> bool {
    first_line == "```" && last_line == "```"
}
```

You can also make text **bold**... whoa!
Or _italic_.
Or... wait for it... **_both!_**
And feel free to go crazy ~~crossing stuff out~~.

There's also [links](https://www.freecodecamp.com), and
> Block Quotes!

And if you want to get really crazy, even tables:

Wild Header | Crazy Header | Another Header?
------------ | ------------- | -------------
Your content can | be here, and it | can be here....
And here. | Okay. | I think we get it.

- And of course there are lists.
  - Some are bulleted.
     - With different indentation levels.
        - That look like this.

1. And there are numbered lists too.
1. Use just 1s if you want!
1. But the list goes on...

- [x] Task lists work as well.
- [ ] Even the unfinished ones.

* And last but not least, let's not forget embedded images:

![Ferris the crab](https://rustacean.net/assets/rustacean-flat-happy.png)
"#;
