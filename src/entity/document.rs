// src/entity/document.rs

/// The note a fresh notebook starts with: a short markdown tutorial.
pub const DEFAULT_DOCUMENT: &str = r##"# Welcome to Your Markdown Notebook

This is a simple markdown notebook for ideation and note-taking.

## Features

- **Toggle between Read and Edit modes** - Press Ctrl+E to switch
- **Markdown support** - Use standard markdown syntax
- **Auto-save** - Your notes are automatically saved to local storage
- **Simple text editing** - Clean, distraction-free editing experience

## Getting Started

Press Ctrl+E to start writing your notes. Here are some markdown examples:

### Text Formatting

You can make text **bold**, *italic*, or ***both***.

### Lists

Unordered list:
- Item 1
- Item 2
- Item 3

Ordered list:
1. First item
2. Second item
3. Third item

### Code

Inline code: `const hello = "world"`

Code block:
```javascript
function greet(name) {
  return `Hello, ${name}!`;
}
```

### Links and Images

[Link to Google](https://google.com)

### Blockquotes

> "The best way to predict the future is to invent it."
> — Alan Kay

### Tables

| Feature | Status |
|---------|--------|
| Read Mode | ✓ |
| Edit Mode | ✓ |
| Auto-save | ✓ |

---

**Happy note-taking!**
"##;
